//! # Syscall Tests
//!
//! The `ecall` boundary of an unprivileged hart, driven through a mock handler.

use mockall::predicate::always;
use pretty_assertions::assert_eq;
use rv32hart_core::common::error::{CpuError, ExecError, SyscallError};
use rv32hart_core::core::cpu::SyscallOutcome;

use crate::common::builder::listing;
use crate::common::harness::{TEXT_BASE, TestContext};
use crate::common::mocks::MockSyscalls;

#[test]
fn handler_sees_arguments_and_return_lands_in_a0() {
    let mut syscalls = MockSyscalls::new();
    let _ = syscalls
        .expect_handle()
        .withf(|call, _| call.id == 64 && call.args == [1, 0x2000, 5])
        .times(1)
        .returning(|_, _| Ok(SyscallOutcome::Return(5)));
    let _ = syscalls
        .expect_handle()
        .withf(|call, _| call.id == 93)
        .times(1)
        .returning(|call, _| Ok(SyscallOutcome::Exit(call.args[0] + 1)));

    let mut ctx = TestContext::new()
        .load_structured(listing(
            "
            li a0, 1
            li a1, 0x2000
            li a2, 5
            li a7, 64
            ecall
            li a7, 93
            ecall
            ",
        ))
        .launch();
    ctx.cpu.set_syscall_handler(Box::new(syscalls));

    assert_eq!(ctx.run(), 6);
}

#[test]
fn handlers_may_touch_guest_memory() {
    let mut syscalls = MockSyscalls::new();
    let _ = syscalls
        .expect_handle()
        .with(always(), always())
        .times(1)
        .returning(|call, mmu| {
            mmu.write_u32(call.args[0], 0xC0FF_EE00).expect("guest buffer");
            Ok(SyscallOutcome::Return(0))
        });

    let mut ctx = TestContext::new()
        .with_data(".buf", 0x4000, vec![0; 4])
        .load_structured(listing(
            "
            li a0, 0x4000
            li a7, 1
            ecall
            ",
        ))
        .launch();
    ctx.cpu.set_syscall_handler(Box::new(syscalls));
    ctx.step_n(3);

    assert_eq!(ctx.cpu.mmu.read_u32(0x4000).unwrap(), 0xC0FF_EE00);
    assert_eq!(ctx.reg("a0"), 0);
}

#[test]
fn unknown_syscalls_fault() {
    let mut ctx = TestContext::new()
        .load_structured(listing(
            "
            li a7, 1
            ecall
            ",
        ))
        .launch();
    ctx.step_n(1);
    match ctx.cpu.step() {
        Err(CpuError::Fault(report)) => {
            assert_eq!(report.pc, TEXT_BASE + 4);
            assert_eq!(report.instruction, "ecall");
            assert_eq!(
                report.error,
                ExecError::Syscall(SyscallError::Unknown { id: 1 })
            );
        }
        other => panic!("expected a fault, got {other:?}"),
    }
}
