//! RISC-V Standard Extension for Atomic Instructions (A).
//!
//! A single hart holds at most one reservation. `lr.w` sets it; `sc.w` succeeds only
//! when it still covers the same address, and always clears it. Trap entry clears it
//! too.

/// Atomic sub-opcode definitions.
pub mod funct5;

/// Atomic extension opcodes.
pub mod opcodes;

use crate::common::error::{ExecError, Trap};
use crate::core::Cpu;
use crate::isa::decode::{Encoding, Selector};
use crate::isa::instruction::{Format, Instruction};
use crate::isa::registry::{instruction_table, Handler, InstructionSet};
use opcodes::{OP_AMO, WIDTH_WORD};

const fn amo(mnemonic: &'static str, f5: u32) -> Encoding {
    Encoding::new(mnemonic, OP_AMO, Some(WIDTH_WORD), Selector::Funct5(f5), Format::Amo)
}

/// Opcode table rows for RV32A.
pub const ENCODINGS: &[Encoding] = &[
    Encoding::new(
        "lr.w",
        OP_AMO,
        Some(WIDTH_WORD),
        Selector::Funct5Rs2(funct5::LR, 0),
        Format::Lr,
    ),
    amo("sc.w", funct5::SC),
    amo("amoswap.w", funct5::AMOSWAP),
    amo("amoadd.w", funct5::AMOADD),
    amo("amoxor.w", funct5::AMOXOR),
    amo("amoand.w", funct5::AMOAND),
    amo("amoor.w", funct5::AMOOR),
    amo("amomin.w", funct5::AMOMIN),
    amo("amomax.w", funct5::AMOMAX),
    amo("amominu.w", funct5::AMOMINU),
    amo("amomaxu.w", funct5::AMOMAXU),
];

/// Atomic handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rv32a;

impl InstructionSet for Rv32a {
    fn name(&self) -> &'static str {
        "rv32a"
    }

    fn load(&self) -> Vec<(String, Handler)> {
        instruction_table![
            lr_w, sc_w, amoswap_w, amoadd_w, amoxor_w, amoand_w, amoor_w, amomin_w, amomax_w,
            amominu_w, amomaxu_w,
        ]
    }
}

fn aligned(addr: u32, trap: fn(u32) -> Trap) -> Result<u32, ExecError> {
    if addr % 4 == 0 {
        Ok(addr)
    } else {
        Err(trap(addr).into())
    }
}

fn lr_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let addr = aligned(
        cpu.regs.read_u(inst.reg(1)?),
        Trap::LoadAddressMisaligned,
    )?;
    let value = cpu.mmu.read_u32(addr)?;
    cpu.regs.write_u(rd, value);
    cpu.reserve(addr);
    Ok(())
}

fn sc_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let addr = aligned(
        cpu.regs.read_u(inst.reg(1)?),
        Trap::StoreAddressMisaligned,
    )?;
    let value = cpu.regs.read_u(inst.reg(2)?);
    if cpu.take_reservation(addr) {
        cpu.mmu.write_u32(addr, value)?;
        cpu.regs.write(rd, 0);
    } else {
        cpu.regs.write(rd, 1);
    }
    Ok(())
}

/// Read-modify-write: `rd` receives the old value, memory receives `op(old, rs2)`.
fn amo_rmw(
    cpu: &mut Cpu,
    inst: &Instruction,
    op: impl FnOnce(u32, u32) -> u32,
) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let addr = aligned(
        cpu.regs.read_u(inst.reg(1)?),
        Trap::StoreAddressMisaligned,
    )?;
    let operand = cpu.regs.read_u(inst.reg(2)?);
    let old = cpu.mmu.read_u32(addr)?;
    cpu.mmu.write_u32(addr, op(old, operand))?;
    cpu.regs.write_u(rd, old);
    Ok(())
}

fn amoswap_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    amo_rmw(cpu, inst, |_, new| new)
}

fn amoadd_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    amo_rmw(cpu, inst, u32::wrapping_add)
}

fn amoxor_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    amo_rmw(cpu, inst, |a, b| a ^ b)
}

fn amoand_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    amo_rmw(cpu, inst, |a, b| a & b)
}

fn amoor_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    amo_rmw(cpu, inst, |a, b| a | b)
}

fn amomin_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    amo_rmw(cpu, inst, |a, b| (a as i32).min(b as i32) as u32)
}

fn amomax_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    amo_rmw(cpu, inst, |a, b| (a as i32).max(b as i32) as u32)
}

fn amominu_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    amo_rmw(cpu, inst, u32::min)
}

fn amomaxu_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    amo_rmw(cpu, inst, u32::max)
}
