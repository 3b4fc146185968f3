//! RISC-V Control and Status Register Instructions (Zicsr).
//!
//! `csrrw` with `rd = x0` does not read the CSR. `csrrs`/`csrrc` with `rs1 = x0` (and
//! their immediate forms with a zero immediate) do not write it. Every access is gated
//! by the CSR's privilege and read-only bits.

/// CSR instruction `funct3` definitions.
pub mod funct3;

use crate::common::error::ExecError;
use crate::core::Cpu;
use crate::isa::abi::REG_ZERO;
use crate::isa::decode::{Encoding, Selector};
use crate::isa::instruction::{Format, Instruction};
use crate::isa::privileged::opcodes::OP_SYSTEM;
use crate::isa::registry::{instruction_table, Handler, InstructionSet};

const fn row(mnemonic: &'static str, f3: u32, format: Format) -> Encoding {
    Encoding::new(mnemonic, OP_SYSTEM, Some(f3), Selector::None, format)
}

/// Opcode table rows for Zicsr.
pub const ENCODINGS: &[Encoding] = &[
    row("csrrw", funct3::CSRRW, Format::Csr),
    row("csrrs", funct3::CSRRS, Format::Csr),
    row("csrrc", funct3::CSRRC, Format::Csr),
    row("csrrwi", funct3::CSRRWI, Format::CsrImm),
    row("csrrsi", funct3::CSRRSI, Format::CsrImm),
    row("csrrci", funct3::CSRRCI, Format::CsrImm),
];

/// CSR access handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Zicsr;

impl InstructionSet for Zicsr {
    fn name(&self) -> &'static str {
        "zicsr"
    }

    fn load(&self) -> Vec<(String, Handler)> {
        instruction_table![csrrw, csrrs, csrrc, csrrwi, csrrsi, csrrci]
    }
}

fn swap(cpu: &mut Cpu, rd: usize, csr: u32, value: u32) -> Result<(), ExecError> {
    let old = if rd == REG_ZERO {
        None
    } else {
        Some(cpu.csr_read(csr)?)
    };
    cpu.csr_write(csr, value)?;
    if let Some(old) = old {
        cpu.regs.write_u(rd, old);
    }
    Ok(())
}

fn modify(
    cpu: &mut Cpu,
    rd: usize,
    csr: u32,
    mask: Option<u32>,
    op: fn(u32, u32) -> u32,
) -> Result<(), ExecError> {
    let old = cpu.csr_read(csr)?;
    if let Some(mask) = mask {
        cpu.csr_write(csr, op(old, mask))?;
    }
    cpu.regs.write_u(rd, old);
    Ok(())
}

/// Source register value, or `None` when the source is `x0`.
fn source_reg(cpu: &Cpu, inst: &Instruction) -> Result<Option<u32>, ExecError> {
    let rs1 = inst.reg(2)?;
    Ok((rs1 != REG_ZERO).then(|| cpu.regs.read_u(rs1)))
}

/// Five-bit immediate, or `None` when it is zero.
fn source_imm(cpu: &Cpu, inst: &Instruction) -> Result<Option<u32>, ExecError> {
    let uimm = (inst.imm(2, &cpu.mmu)? as u32) & 0x1F;
    Ok((uimm != 0).then_some(uimm))
}

fn csrrw(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let csr = inst.csr(1)?;
    let value = cpu.regs.read_u(inst.reg(2)?);
    swap(cpu, rd, csr, value)
}

fn csrrs(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let csr = inst.csr(1)?;
    let mask = source_reg(cpu, inst)?;
    modify(cpu, rd, csr, mask, |old, mask| old | mask)
}

fn csrrc(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let csr = inst.csr(1)?;
    let mask = source_reg(cpu, inst)?;
    modify(cpu, rd, csr, mask, |old, mask| old & !mask)
}

fn csrrwi(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let csr = inst.csr(1)?;
    let value = (inst.imm(2, &cpu.mmu)? as u32) & 0x1F;
    swap(cpu, rd, csr, value)
}

fn csrrsi(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let csr = inst.csr(1)?;
    let mask = source_imm(cpu, inst)?;
    modify(cpu, rd, csr, mask, |old, mask| old | mask)
}

fn csrrci(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let csr = inst.csr(1)?;
    let mask = source_imm(cpu, inst)?;
    modify(cpu, rd, csr, mask, |old, mask| old & !mask)
}
