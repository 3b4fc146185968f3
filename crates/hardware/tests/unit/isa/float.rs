//! Floating-point behaviour: rounding-mode selection, exception flags and the
//! special values produced by invalid operations.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rv32hart_core::common::error::{CpuError, ExecError, Trap};
use rv32hart_core::config::Config;
use rv32hart_core::core::arch::fpr::FloatWidth;

use crate::common::builder::{encode, listing};
use crate::common::harness::{TEXT_BASE, TestContext};

const NX: i32 = 1;
const DZ: i32 = 1 << 3;
const NV: i32 = 1 << 4;

const CLASS_POS_INF: i32 = 1 << 7;
const CLASS_QUIET_NAN: i32 = 1 << 9;

fn run_listing(text: &str) -> TestContext {
    let program = listing(text);
    let steps = program.len();
    let mut ctx = TestContext::new().load_structured(program).launch();
    ctx.step_n(steps);
    ctx
}

#[rstest]
#[case("rtz", 3)]
#[case("rne", 4)]
#[case("rdn", 3)]
#[case("rup", 4)]
#[case("rmm", 4)]
fn static_rounding_modes(#[case] mode: &str, #[case] expected: i32) {
    let ctx = run_listing(&format!(
        "
        li a0, 7
        li a1, 2
        fcvt.s.w fa0, a0
        fcvt.s.w fa1, a1
        fdiv.s fa2, fa0, fa1
        fcvt.w.s a2, fa2, {mode}
        csrrs a3, fflags, zero
        "
    ));
    assert_eq!(ctx.cpu.regs.read_f32(12), 3.5);
    assert_eq!(ctx.reg("a2"), expected);
    assert_eq!(ctx.reg("a3"), NX);
}

#[test]
fn dynamic_rounding_reads_frm() {
    let ctx = run_listing(
        "
        li a0, -7
        li a1, 2
        fcvt.s.w fa0, a0
        fcvt.s.w fa1, a1
        fdiv.s fa2, fa0, fa1
        csrrwi zero, frm, 2
        fcvt.w.s a2, fa2
        csrrwi zero, frm, 1
        fcvt.w.s a3, fa2
        ",
    );
    assert_eq!(ctx.reg("a2"), -4);
    assert_eq!(ctx.reg("a3"), -3);
}

#[test]
fn reserved_rounding_mode_is_illegal() {
    let word = (encode("fcvt.w.s", &[10, 1]) & !(0b111 << 12)) | (0b101 << 12);
    let mut ctx = TestContext::new().load_words(&[word]).launch();
    match ctx.cpu.step() {
        Err(CpuError::Fault(report)) => {
            assert_eq!(report.pc, TEXT_BASE);
            assert_eq!(
                report.error,
                ExecError::Trap(Trap::IllegalInstruction(word))
            );
        }
        other => panic!("expected a fault, got {other:?}"),
    }
}

#[test]
fn division_by_zero_gives_infinity() {
    let ctx = run_listing(
        "
        li a0, 1
        fcvt.s.w fa0, a0
        fcvt.s.w fa1, zero
        fdiv.s fa2, fa0, fa1
        fclass.s a1, fa2
        csrrs a2, fflags, zero
        ",
    );
    assert_eq!(ctx.reg("a1"), CLASS_POS_INF);
    assert_eq!(ctx.reg("a2"), DZ);
}

#[test]
fn invalid_operations_produce_canonical_nan() {
    let ctx = run_listing(
        "
        li a0, -1
        fcvt.s.w fa0, a0
        fsqrt.s fa1, fa0
        fclass.s a1, fa1
        fcvt.w.s a2, fa1
        csrrs a3, fflags, zero
        ",
    );
    assert_eq!(ctx.cpu.regs.read_f32(11).to_bits(), 0x7FC0_0000);
    assert_eq!(ctx.reg("a1"), CLASS_QUIET_NAN);
    assert_eq!(ctx.reg("a2"), i32::MAX);
    assert_eq!(ctx.reg("a3") & NV, NV);
}

#[test]
fn flags_accumulate_until_cleared() {
    let ctx = run_listing(
        "
        li a0, 1
        fcvt.s.w fa0, a0
        fcvt.s.w fa1, zero
        fdiv.s fa2, fa0, fa1
        fsqrt.s fa3, fa2
        fcvt.w.s a1, fa2
        csrrs a2, fflags, zero
        csrrwi zero, fflags, 0
        csrrs a3, fcsr, zero
        ",
    );
    assert_eq!(ctx.reg("a2"), DZ | NV);
    assert_eq!(ctx.reg("a3"), 0);
}

#[test]
fn single_precision_values_are_zero_extended() {
    let ctx = run_listing(
        "
        li a0, 5
        fcvt.s.w fa0, a0
        ",
    );
    assert_eq!(ctx.cpu.regs.read_f_bits(10) >> 32, 0);
    assert_eq!(ctx.cpu.regs.read_f32(10), 5.0);
}

#[test]
fn double_precision_arithmetic() {
    let ctx = run_listing(
        "
        li a0, 3
        li a1, 4
        fcvt.d.w fa0, a0
        fcvt.d.w fa1, a1
        fmul.d fa2, fa0, fa1
        fcvt.w.d a2, fa2
        fcvt.s.d fa3, fa2
        feq.s a3, fa3, fa3
        ",
    );
    assert_eq!(ctx.cpu.regs.read_f64(12), 12.0);
    assert_eq!(ctx.reg("a2"), 12);
    assert_eq!(ctx.cpu.regs.read_f32(13), 12.0);
    assert_eq!(ctx.reg("a3"), 1);
}

#[test]
fn double_instructions_need_64_bit_registers() {
    let mut config = Config::default();
    config.registers.flen = FloatWidth::F32;
    let mut ctx = TestContext::with_config(&config)
        .load_structured(listing("fadd.d fa0, fa1, fa2"))
        .launch();
    let err = ctx.cpu.step().unwrap_err();
    assert!(
        matches!(&err, CpuError::Fault(report) if report.error == ExecError::Trap(Trap::IllegalInstruction(0))),
        "{err:?}"
    );
}
