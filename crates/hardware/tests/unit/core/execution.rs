//! # Execution Loop Tests
//!
//! Cycle accounting, control transfer, fault reports and the run loop's stop
//! conditions.

use pretty_assertions::assert_eq;
use rv32hart_core::common::AccessType;
use rv32hart_core::common::error::{CpuError, ExecError, FaultReport, MemoryError, Trap};
use rv32hart_core::config::Config;
use rv32hart_core::core::arch::csr::{MCAUSE, MTVAL, MTVEC};
use rv32hart_core::sim::program::Program;
use rv32hart_core::soc::memory::{MemoryFlags, MemorySection};

use crate::common::builder::{encode, listing};
use crate::common::harness::{TEXT_BASE, TestContext};

#[test]
fn pc_advances_and_counters_tick() {
    let mut ctx = TestContext::new()
        .load_words(&[
            encode("addi", &[10, 0, 5]),
            encode("slli", &[10, 10, 2]),
            encode("xori", &[11, 10, -1]),
        ])
        .launch();
    ctx.step_n(3);
    assert_eq!(ctx.cpu.pc, TEXT_BASE + 12);
    assert_eq!(ctx.reg("a0"), 20);
    assert_eq!(ctx.reg("a1"), !20);
    assert_eq!(ctx.cpu.cycle, 3);
    assert_eq!(ctx.cpu.instret, 3);
}

#[test]
fn unprivileged_launch_sets_up_the_stack() {
    let ctx = TestContext::new().load_words(&[0]).launch();
    let stack = ctx.cpu.mmu.section_named(".stack").expect("stack section");
    assert_eq!(ctx.reg("sp") as u32, stack.base() + stack.size());
    assert_eq!(ctx.reg("a0"), 0);
}

#[test]
fn jal_links_and_jalr_returns() {
    let mut ctx = TestContext::new()
        .load_words(&[
            encode("jal", &[1, 12]),
            encode("addi", &[11, 0, 2]),
            encode("jal", &[0, 12]),
            encode("addi", &[10, 0, 1]),
            encode("jalr", &[0, 1, 0]),
        ])
        .launch();
    ctx.step_n(5);
    assert_eq!(ctx.reg("ra") as u32, TEXT_BASE + 4);
    assert_eq!(ctx.reg("a0"), 1);
    assert_eq!(ctx.reg("a1"), 2);
    assert_eq!(ctx.cpu.pc, TEXT_BASE + 20);
}

#[test]
fn misaligned_jumps_fault() {
    let mut ctx = TestContext::new()
        .load_words(&[encode("addi", &[5, 0, 6]), encode("jalr", &[1, 5, 0])])
        .launch();
    ctx.step_n(1);
    match ctx.cpu.step() {
        Err(CpuError::Fault(report)) => {
            assert_eq!(report.pc, TEXT_BASE + 4);
            assert_eq!(
                report.error,
                ExecError::Trap(Trap::InstructionAddressMisaligned(6))
            );
        }
        other => panic!("expected a fault, got {other:?}"),
    }
    assert_eq!(ctx.reg("ra"), 0);
}

#[test]
fn unmapped_loads_halt_an_unprivileged_hart() {
    let mut ctx = TestContext::new()
        .load_words(&[encode("lw", &[10, 0, 0])])
        .launch();
    let err = ctx.cpu.step().unwrap_err();
    assert_eq!(
        err,
        CpuError::Fault(FaultReport {
            pc: TEXT_BASE,
            instruction: "lw a0, 0(zero)".to_string(),
            error: ExecError::Memory(MemoryError::OutOfBounds {
                addr: 0,
                size: 4,
                access: AccessType::Read,
            }),
        })
    );
    assert!(ctx.cpu.halted);
    assert_eq!(ctx.cpu.exit_code, Some(1));
    assert_eq!(ctx.cpu.step(), Ok(()));
}

#[test]
fn loads_beyond_the_address_space_trap_on_a_machine_hart() {
    let mut ctx = TestContext::privileged()
        .load_words(&[encode("lui", &[5, 0x80000]), encode("lw", &[10, 5, 0])])
        .launch();
    ctx.cpu.csrs.set_raw(MTVEC, TEXT_BASE + 0x100);
    ctx.step_n(3);
    assert_eq!(
        ctx.cpu.csrs.raw(MCAUSE),
        Trap::LoadAccessFault(0).mcause()
    );
    assert_eq!(ctx.cpu.csrs.raw(MTVAL), 0x8000_0000);
}

#[test]
fn fetching_from_unmapped_memory_is_reported() {
    let mut ctx = TestContext::new().load_words(&[encode("jal", &[0, 0x100])]).launch();
    ctx.step_n(1);
    match ctx.cpu.step() {
        Err(CpuError::Fault(report)) => {
            assert_eq!(report.pc, TEXT_BASE + 0x100);
            assert_eq!(report.instruction, "<fetch failed>");
        }
        other => panic!("expected a fault, got {other:?}"),
    }
}

#[test]
fn sub_word_loads_extend_correctly() {
    let mut ctx = TestContext::new()
        .with_data(".data", 0x4000, vec![0x80, 0xFF, 0x7F, 0x01])
        .load_words(&[
            encode("lui", &[5, 0x4]),
            encode("lb", &[10, 5, 0]),
            encode("lbu", &[11, 5, 0]),
            encode("lh", &[12, 5, 0]),
            encode("lhu", &[13, 5, 0]),
            encode("sh", &[13, 5, 2]),
            encode("lw", &[14, 5, 0]),
        ])
        .launch();
    ctx.step_n(7);
    assert_eq!(ctx.reg("a0"), -128);
    assert_eq!(ctx.reg("a1"), 0x80);
    assert_eq!(ctx.reg("a2"), -128);
    assert_eq!(ctx.reg("a3"), 0xFF80);
    assert_eq!(ctx.reg("a4") as u32, 0xFF80_FF80);
}

#[test]
fn division_follows_riscv_edge_cases() {
    let program = listing(
        "
        li a0, -2147483648
        li a1, -1
        div a2, a0, a1
        rem a3, a0, a1
        divu a4, a0, zero
        rem a5, a1, zero
        mulh a6, a0, a0
        ",
    );
    let mut ctx = TestContext::new().load_structured(program).launch();
    ctx.step_n(7);
    assert_eq!(ctx.reg("a2"), i32::MIN);
    assert_eq!(ctx.reg("a3"), 0);
    assert_eq!(ctx.reg("a4"), -1);
    assert_eq!(ctx.reg("a5"), -1);
    assert_eq!(ctx.reg("a6"), 0x4000_0000);
}

#[test]
fn cycle_limit_stops_runaway_programs() {
    let mut config = Config::default();
    config.general.max_cycles = Some(10);
    let mut ctx = TestContext::with_config(&config)
        .load_words(&[encode("jal", &[0, 0])])
        .launch();
    assert_eq!(
        ctx.cpu.run(),
        Err(CpuError::CycleLimit {
            limit: 10,
            pc: TEXT_BASE,
        })
    );
    assert_eq!(ctx.cpu.cycle, 10);
}

#[test]
fn sret_is_recognised_but_unimplemented() {
    let mut ctx = TestContext::privileged()
        .load_words(&[encode("sret", &[])])
        .launch();
    assert_eq!(
        ctx.cpu.step(),
        Err(CpuError::Unimplemented {
            mnemonic: "sret".to_string(),
            pc: TEXT_BASE,
        })
    );
    assert_eq!(ctx.cpu.pc, TEXT_BASE + 4);
}

#[test]
fn structured_branches_resolve_labels() {
    let mut program = Program::with_base("labels", TEXT_BASE);
    program
        .add_section(MemorySection::from_instructions(
            ".text",
            TEXT_BASE,
            MemoryFlags::TEXT,
            listing(
                "
                li a0, 0
                beqz a0, skip
                addi a1, zero, 1
                addi a2, zero, 2
                ",
            ),
        ))
        .unwrap();
    program.add_label("skip", TEXT_BASE + 12);

    let mut ctx = TestContext::new();
    let _ = ctx.cpu.load_program(program, None).unwrap();
    let mut ctx = ctx.launch();
    ctx.step_n(3);
    assert_eq!(ctx.reg("a1"), 0);
    assert_eq!(ctx.reg("a2"), 2);
}

#[test]
fn la_loads_absolute_addresses() {
    let mut program = Program::with_base("addresses", TEXT_BASE);
    program
        .add_section(MemorySection::from_instructions(
            ".text",
            TEXT_BASE,
            MemoryFlags::TEXT,
            listing(
                "
                la a0, 0x2000
                la a1, buffer
                ",
            ),
        ))
        .unwrap();
    program.add_label("buffer", TEXT_BASE + 0x40);

    let mut ctx = TestContext::new();
    let _ = ctx.cpu.load_program(program, None).unwrap();
    let mut ctx = ctx.launch();
    ctx.step_n(2);
    assert_eq!(ctx.reg("a0"), 0x2000);
    assert_eq!(ctx.reg("a1") as u32, TEXT_BASE + 0x40);
}
