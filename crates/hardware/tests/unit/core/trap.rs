//! # Trap Tests
//!
//! Trap entry and `mret` on a machine-mode hart, privilege transitions, and the timer
//! interrupt with its `mstatus.MIE` gating, vectored dispatch and `wfi` wake-up.

use pretty_assertions::assert_eq;
use rv32hart_core::common::error::Trap;
use rv32hart_core::core::arch::csr::{
    HALT, MCAUSE, MEPC, MIP, MIP_MTIP, MTIMECMP, MTIMECMPH, MTVAL, MTVEC, MstatusField,
};
use rv32hart_core::core::arch::mode::PrivilegeMode;

use crate::common::builder::encode;
use crate::common::harness::{TEXT_BASE, TestContext};

const HANDLER: u32 = TEXT_BASE + 0x20;
const FAR_FUTURE: u32 = 50_000_000;

fn nop() -> u32 {
    encode("addi", &[0, 0, 0])
}

/// Main code, padded with `nop` up to the handler at `HANDLER`.
fn with_handler(main: &[u32], handler: &[u32]) -> Vec<u32> {
    let mut words = main.to_vec();
    words.resize(((HANDLER - TEXT_BASE) / 4) as usize, nop());
    words.extend_from_slice(handler);
    words
}

fn machine_hart(words: &[u32]) -> TestContext {
    let mut ctx = TestContext::privileged().load_words(words).launch();
    ctx.cpu.csrs.set_raw(MTVEC, HANDLER);
    ctx
}

#[test]
fn ecall_enters_the_handler_and_mret_returns() {
    let words = with_handler(
        &[
            encode("ecall", &[]),
            encode("addi", &[11, 0, 2]),
            encode("csrrwi", &[0, HALT as i32, 5]),
        ],
        &[
            encode("csrrs", &[5, MEPC as i32, 0]),
            encode("addi", &[5, 5, 4]),
            encode("csrrw", &[0, MEPC as i32, 5]),
            encode("addi", &[10, 0, 1]),
            encode("mret", &[]),
        ],
    );
    let mut ctx = machine_hart(&words);

    assert_eq!(ctx.run(), 5);
    assert_eq!(ctx.reg("a0"), 1);
    assert_eq!(ctx.reg("a1"), 2);
    assert_eq!(
        ctx.cpu.csrs.raw(MCAUSE),
        Trap::EnvironmentCallFromMMode.mcause()
    );
    assert_eq!(ctx.cpu.csrs.raw(MEPC), TEXT_BASE + 4);
    assert_eq!(ctx.cpu.privilege, PrivilegeMode::Machine);
}

#[test]
fn trap_entry_saves_state() {
    let words = with_handler(&[encode("ecall", &[])], &[nop()]);
    let mut ctx = machine_hart(&words);
    ctx.cpu.csrs.set_mstatus_field(MstatusField::Mie, 1);

    ctx.step_n(1);
    assert_eq!(ctx.cpu.pending_traps().len(), 1);
    assert_eq!(ctx.cpu.pc, TEXT_BASE);

    ctx.step_n(1);
    let csrs = &ctx.cpu.csrs;
    assert_eq!(csrs.mstatus_field(MstatusField::Mie), 0);
    assert_eq!(csrs.mstatus_field(MstatusField::Mpie), 1);
    assert_eq!(
        csrs.mstatus_field(MstatusField::Mpp),
        PrivilegeMode::Machine.to_bits()
    );
    assert_eq!(csrs.raw(MEPC), TEXT_BASE);
    assert_eq!(ctx.cpu.pc, HANDLER + 4);
}

#[test]
fn trap_and_mret_round_trip_with_interrupts_enabled() {
    let words = with_handler(
        &[encode("ecall", &[]), nop(), nop()],
        &[
            encode("csrrs", &[5, MEPC as i32, 0]),
            encode("addi", &[5, 5, 4]),
            encode("csrrw", &[0, MEPC as i32, 5]),
            encode("mret", &[]),
        ],
    );
    let mut ctx = machine_hart(&words);
    ctx.cpu.csrs.set_mstatus_field(MstatusField::Mie, 1);

    ctx.step_n(2);
    assert_eq!(ctx.cpu.csrs.mstatus_field(MstatusField::Mie), 0);
    assert_eq!(ctx.cpu.csrs.mstatus_field(MstatusField::Mpie), 1);
    assert_eq!(ctx.cpu.csrs.raw(MEPC), TEXT_BASE);
    assert_eq!(
        ctx.cpu.csrs.raw(MCAUSE),
        Trap::EnvironmentCallFromMMode.mcause()
    );
    assert_eq!(ctx.cpu.privilege, PrivilegeMode::Machine);

    ctx.step_n(3);
    assert_eq!(ctx.cpu.pc, TEXT_BASE + 4);
    assert_eq!(ctx.cpu.csrs.mstatus_field(MstatusField::Mie), 1);
    assert_eq!(ctx.cpu.csrs.mstatus_field(MstatusField::Mpie), 1);
    assert_eq!(ctx.cpu.privilege, PrivilegeMode::Machine);
    assert!(ctx.cpu.pending_traps().is_empty());
}

#[test]
fn illegal_words_trap_with_the_encoding() {
    let words = with_handler(
        &[0xFFFF_FFFF],
        &[
            encode("csrrs", &[10, MTVAL as i32, 0]),
            encode("csrrwi", &[0, HALT as i32, 1]),
        ],
    );
    let mut ctx = machine_hart(&words);

    assert_eq!(ctx.run(), 1);
    assert_eq!(ctx.reg("a0"), -1);
    assert_eq!(
        ctx.cpu.csrs.raw(MCAUSE),
        Trap::IllegalInstruction(0).mcause()
    );
}

#[test]
fn mret_drops_to_user_and_user_mret_is_illegal() {
    let words = with_handler(
        &[encode("mret", &[]), encode("mret", &[])],
        &[
            encode("csrrs", &[10, MCAUSE as i32, 0]),
            encode("csrrwi", &[0, HALT as i32, 3]),
        ],
    );
    let mut ctx = machine_hart(&words);
    ctx.cpu.csrs.set_raw(MEPC, TEXT_BASE + 4);

    ctx.step_n(1);
    assert_eq!(ctx.cpu.privilege, PrivilegeMode::User);
    assert_eq!(ctx.cpu.pc, TEXT_BASE + 4);

    assert_eq!(ctx.run(), 3);
    assert_eq!(ctx.reg("a0") as u32, Trap::IllegalInstruction(0).mcause());
    assert_eq!(
        ctx.cpu.csrs.mstatus_field(MstatusField::Mpp),
        PrivilegeMode::User.to_bits()
    );
    assert_eq!(ctx.cpu.csrs.raw(MEPC), TEXT_BASE + 4);
}

#[test]
fn unsupported_previous_privilege_returns_to_user() {
    let mut ctx = machine_hart(&[encode("mret", &[]), nop()]);
    ctx.cpu.csrs.set_mstatus_field(MstatusField::Mpp, 1);
    ctx.cpu.csrs.set_raw(MEPC, TEXT_BASE + 4);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.privilege, PrivilegeMode::User);
}

fn arm_timer(ctx: &mut TestContext) {
    ctx.cpu.csr_write(MTIMECMPH, 0).unwrap();
    ctx.cpu.csr_write(MTIMECMP, FAR_FUTURE).unwrap();
}

fn elapse(ctx: &mut TestContext) {
    ctx.cpu.clock_mut().advance(2 * u64::from(FAR_FUTURE));
}

#[test]
fn timer_interrupt_fires_once() {
    let mut ctx = machine_hart(&vec![nop(); 24]);
    ctx.cpu.csrs.set_mstatus_field(MstatusField::Mie, 1);
    arm_timer(&mut ctx);

    ctx.step_n(1);
    assert_eq!(ctx.cpu.pc, TEXT_BASE + 4);

    elapse(&mut ctx);
    ctx.step_n(1);
    assert_eq!(
        ctx.cpu.csrs.raw(MCAUSE),
        Trap::MachineTimerInterrupt.mcause()
    );
    assert_eq!(ctx.cpu.csrs.raw(MEPC), TEXT_BASE + 4);
    assert_eq!(ctx.cpu.csrs.raw(MIP) & MIP_MTIP, 0);
    assert_eq!(ctx.cpu.pc, HANDLER + 4);

    elapse(&mut ctx);
    ctx.step_n(1);
    assert!(ctx.cpu.pending_traps().is_empty());
    assert_eq!(ctx.cpu.pc, HANDLER + 8);
}

#[test]
fn interrupts_wait_for_mie() {
    let mut ctx = machine_hart(&vec![nop(); 24]);
    arm_timer(&mut ctx);
    elapse(&mut ctx);

    ctx.step_n(2);
    assert_eq!(ctx.cpu.pc, TEXT_BASE + 8);
    assert_eq!(ctx.cpu.pending_traps().len(), 1);
    assert_eq!(ctx.cpu.csrs.raw(MIP) & MIP_MTIP, MIP_MTIP);

    ctx.cpu.csrs.set_mstatus_field(MstatusField::Mie, 1);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.csrs.raw(MEPC), TEXT_BASE + 8);
    assert_eq!(ctx.cpu.pc, HANDLER + 4);
}

#[test]
fn vectored_mode_offsets_interrupts() {
    let mut ctx = machine_hart(&vec![nop(); 24]);
    ctx.cpu.csrs.set_raw(MTVEC, HANDLER | 1);
    ctx.cpu.csrs.set_mstatus_field(MstatusField::Mie, 1);
    arm_timer(&mut ctx);
    elapse(&mut ctx);

    ctx.step_n(1);
    let code = Trap::MachineTimerInterrupt.code();
    assert_eq!(ctx.cpu.pc, HANDLER + 4 * code + 4);
}

#[test]
fn vectored_mode_offsets_exceptions() {
    let mut ctx = machine_hart(&with_handler(&[0xFFFF_FFFF], &[nop(); 4]));
    ctx.cpu.csrs.set_raw(MTVEC, HANDLER | 1);

    ctx.step_n(2);
    let trap = Trap::IllegalInstruction(0xFFFF_FFFF);
    assert_eq!(ctx.cpu.csrs.raw(MCAUSE), trap.mcause());
    assert_eq!(ctx.cpu.csrs.raw(MTVAL), 0xFFFF_FFFF);
    assert_eq!(ctx.cpu.pc, HANDLER + 4 * trap.code() + 4);
}

#[test]
fn wfi_stalls_until_an_interrupt_arrives() {
    let mut words = vec![encode("wfi", &[])];
    words.resize(24, nop());
    let mut ctx = machine_hart(&words);
    ctx.cpu.csrs.set_mstatus_field(MstatusField::Mie, 1);
    arm_timer(&mut ctx);

    ctx.step_n(3);
    assert!(ctx.cpu.wfi_waiting);
    assert_eq!(ctx.cpu.pc, TEXT_BASE + 4);
    assert_eq!(ctx.cpu.cycle, 3);
    assert_eq!(ctx.cpu.instret, 1);

    elapse(&mut ctx);
    ctx.step_n(1);
    assert!(!ctx.cpu.wfi_waiting);
    assert_eq!(ctx.cpu.csrs.raw(MEPC), TEXT_BASE + 4);
    assert_eq!(ctx.cpu.pc, HANDLER + 4);
}
