//! RISC-V Standard Extension for Integer Multiplication and Division (M).
//!
//! Division by zero and signed overflow never trap: they produce the results fixed
//! by the ISA (`-1` / the dividend for division by zero, `i32::MIN` / `0` on
//! overflow).

/// Function code 3 definitions for multiply/divide.
pub mod funct3;

/// M-extension opcodes.
pub mod opcodes;

use crate::common::error::ExecError;
use crate::core::Cpu;
use crate::isa::decode::{Encoding, Selector};
use crate::isa::instruction::{Format, Instruction};
use crate::isa::registry::{instruction_table, Handler, InstructionSet};
use opcodes::{M_EXTENSION, OP_REG};

const fn row(mnemonic: &'static str, f3: u32) -> Encoding {
    Encoding::new(mnemonic, OP_REG, Some(f3), Selector::Funct7(M_EXTENSION), Format::R)
}

/// Opcode table rows for RV32M.
pub const ENCODINGS: &[Encoding] = &[
    row("mul", funct3::MUL),
    row("mulh", funct3::MULH),
    row("mulhsu", funct3::MULHSU),
    row("mulhu", funct3::MULHU),
    row("div", funct3::DIV),
    row("divu", funct3::DIVU),
    row("rem", funct3::REM),
    row("remu", funct3::REMU),
];

/// Multiply/divide handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rv32m;

impl InstructionSet for Rv32m {
    fn name(&self) -> &'static str {
        "rv32m"
    }

    fn load(&self) -> Vec<(String, Handler)> {
        instruction_table![mul, mulh, mulhsu, mulhu, div, divu, rem, remu]
    }
}

fn binary(
    cpu: &mut Cpu,
    inst: &Instruction,
    op: impl FnOnce(i32, i32) -> i32,
) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let lhs = cpu.regs.read(inst.reg(1)?);
    let rhs = cpu.regs.read(inst.reg(2)?);
    cpu.regs.write(rd, op(lhs, rhs));
    Ok(())
}

/// Signed division with the RISC-V results for `x / 0` and `MIN / -1`.
pub const fn div_signed(lhs: i32, rhs: i32) -> i32 {
    if rhs == 0 {
        -1
    } else {
        lhs.wrapping_div(rhs)
    }
}

/// Unsigned division; `x / 0` is all ones.
pub const fn div_unsigned(lhs: u32, rhs: u32) -> u32 {
    if rhs == 0 { u32::MAX } else { lhs / rhs }
}

/// Signed remainder; `x % 0` is `x` and `MIN % -1` is zero.
pub const fn rem_signed(lhs: i32, rhs: i32) -> i32 {
    if rhs == 0 {
        lhs
    } else {
        lhs.wrapping_rem(rhs)
    }
}

/// Unsigned remainder; `x % 0` is `x`.
pub const fn rem_unsigned(lhs: u32, rhs: u32) -> u32 {
    if rhs == 0 { lhs } else { lhs % rhs }
}

fn mul(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    binary(cpu, inst, i32::wrapping_mul)
}

fn mulh(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    binary(cpu, inst, |a, b| ((i64::from(a) * i64::from(b)) >> 32) as i32)
}

fn mulhsu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    binary(cpu, inst, |a, b| {
        ((i64::from(a) * i64::from(b as u32)) >> 32) as i32
    })
}

fn mulhu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    binary(cpu, inst, |a, b| {
        ((u64::from(a as u32) * u64::from(b as u32)) >> 32) as i32
    })
}

fn div(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    binary(cpu, inst, div_signed)
}

fn divu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    binary(cpu, inst, |a, b| div_unsigned(a as u32, b as u32) as i32)
}

fn rem(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    binary(cpu, inst, rem_signed)
}

fn remu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    binary(cpu, inst, |a, b| rem_unsigned(a as u32, b as u32) as i32)
}
