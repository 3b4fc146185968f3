//! # Atomic Memory Operation Tests

use pretty_assertions::assert_eq;
use rstest::rstest;
use rv32hart_core::common::error::{CpuError, ExecError, Trap};

use crate::common::builder::listing;
use crate::common::harness::TestContext;

const WORD: u32 = 0x4000;

fn run(text: &str, initial: u32) -> TestContext {
    let program = listing(text);
    let steps = program.len();
    let mut ctx = TestContext::new()
        .with_data(".atomic", WORD, [initial.to_le_bytes(), [0; 4]].concat())
        .load_structured(program)
        .launch();
    ctx.step_n(steps);
    ctx
}

#[test]
fn store_conditional_needs_a_matching_reservation() {
    let ctx = run(
        "
        li a2, 0x4000
        li a1, 99
        lr.w a0, a2
        sc.w a3, a2, a1
        sc.w a4, a2, a1
        ",
        7,
    );
    assert_eq!(ctx.reg("a0"), 7);
    assert_eq!(ctx.reg("a3"), 0);
    assert_eq!(ctx.reg("a4"), 1);
    assert_eq!(ctx.cpu.reservation(), None);
}

#[test]
fn reservation_on_another_address_fails() {
    let ctx = run(
        "
        li a2, 0x4000
        li a5, 0x4004
        lr.w a0, a5
        sc.w a3, a2, a1
        ",
        0,
    );
    assert_eq!(ctx.reg("a3"), 1);
}

#[rstest]
#[case("amoswap.w", 5, 3, 3)]
#[case("amoadd.w", 5, 3, 8)]
#[case("amoxor.w", 0b110, 0b011, 0b101)]
#[case("amoand.w", 0b110, 0b011, 0b010)]
#[case("amoor.w", 0b110, 0b011, 0b111)]
#[case("amomin.w", 0xFFFF_FFFF, 3, 0xFFFF_FFFF)]
#[case("amominu.w", 0xFFFF_FFFF, 3, 3)]
#[case("amomax.w", 0xFFFF_FFFF, 3, 3)]
#[case("amomaxu.w", 0xFFFF_FFFF, 3, 0xFFFF_FFFF)]
fn read_modify_write(
    #[case] mnemonic: &str,
    #[case] initial: u32,
    #[case] operand: i32,
    #[case] stored: u32,
) {
    let mut ctx = run(
        &format!(
            "
            li a2, 0x4000
            li a1, {operand}
            {mnemonic} a0, a2, a1
            "
        ),
        initial,
    );
    assert_eq!(ctx.reg("a0") as u32, initial);
    assert_eq!(ctx.cpu.mmu.read_u32(WORD).unwrap(), stored);
}

#[test]
fn misaligned_atomics_fault() {
    let program = listing(
        "
        li a2, 0x4002
        amoadd.w a0, a2, a1
        ",
    );
    let mut ctx = TestContext::new()
        .with_data(".atomic", WORD, vec![0; 8])
        .load_structured(program)
        .launch();
    ctx.step_n(1);
    match ctx.cpu.step() {
        Err(CpuError::Fault(report)) => assert_eq!(
            report.error,
            ExecError::Trap(Trap::StoreAddressMisaligned(0x4002))
        ),
        other => panic!("expected a fault, got {other:?}"),
    }
}
