//! Dispatch registry tests: duplicate detection and custom instruction sets.

use pretty_assertions::assert_eq;
use rv32hart_core::common::error::{CpuError, ExecError};
use rv32hart_core::config::Config;
use rv32hart_core::core::Cpu;
use rv32hart_core::isa::instruction::Instruction;
use rv32hart_core::isa::registry::{DispatchTable, Handler, InstructionSet, standard_sets};
use rv32hart_core::isa::rv32i::Rv32i;
use rv32hart_core::sim::program::Program;
use rv32hart_core::soc::memory::{MemoryFlags, MemorySection};

use crate::common::builder::listing;
use crate::common::harness::{TEXT_BASE, TestContext, init_tracing};

#[derive(Debug)]
struct Shadow;

impl InstructionSet for Shadow {
    fn name(&self) -> &'static str {
        "shadow"
    }

    fn load(&self) -> Vec<(String, Handler)> {
        vec![("add".to_string(), answer as Handler)]
    }
}

#[derive(Debug)]
struct Custom;

impl InstructionSet for Custom {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn load(&self) -> Vec<(String, Handler)> {
        vec![("answer".to_string(), answer as Handler)]
    }
}

fn answer(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    cpu.regs.write(rd, 42);
    Ok(())
}

#[test]
fn standard_table_covers_every_set() {
    let table = DispatchTable::build(&standard_sets()).expect("disjoint");
    for (mnemonic, owner) in [
        ("addi", "rv32i"),
        ("la", "rv32i"),
        ("divu", "rv32m"),
        ("sc.w", "rv32a"),
        ("fmadd.s", "rv32f"),
        ("fcvt.d.s", "rv32d"),
        ("csrrci", "zicsr"),
        ("mret", "system"),
    ] {
        assert_eq!(table.owner(mnemonic), Some(owner), "{mnemonic}");
    }
    assert!(table.get("vadd.vv").is_none());
    assert_eq!(table.mnemonics().len(), table.len());
}

#[test]
fn duplicate_mnemonics_are_rejected() {
    let sets: Vec<Box<dyn InstructionSet>> = vec![Box::new(Rv32i), Box::new(Shadow)];
    let err = DispatchTable::build(&sets).unwrap_err();
    assert_eq!(
        err,
        CpuError::DuplicateMnemonic {
            mnemonic: "add".to_string(),
            first: "rv32i",
            second: "shadow",
        }
    );
}

#[test]
fn custom_sets_extend_the_hart() {
    init_tracing();
    let mut sets = standard_sets();
    sets.push(Box::new(Custom));
    let mut cpu = Cpu::with_instruction_sets(&Config::default(), &sets).expect("disjoint");

    let mut program = Program::with_base("custom", TEXT_BASE);
    program
        .add_section(MemorySection::from_instructions(
            ".text",
            TEXT_BASE,
            MemoryFlags::TEXT,
            listing(
                "
                answer a0
                addi a7, zero, 93
                ecall
                ",
            ),
        ))
        .unwrap();
    let _ = cpu.load_program(program, None).unwrap();
    cpu.launch(None).unwrap();

    assert_eq!(cpu.run().unwrap(), 42);
}

#[test]
fn missing_handler_stops_the_hart() {
    let mut ctx = TestContext::new()
        .load_structured(listing("frobnicate a0"))
        .launch();
    let err = ctx.cpu.step().unwrap_err();
    assert_eq!(
        err,
        CpuError::UnknownMnemonic {
            mnemonic: "frobnicate".to_string(),
            pc: TEXT_BASE,
        }
    );
    assert!(ctx.cpu.halted);
}
