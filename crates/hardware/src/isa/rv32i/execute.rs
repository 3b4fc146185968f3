//! RV32I handlers.
//!
//! Every handler accepts both structured and raw instructions; operand positions follow
//! the decoded order of the instruction's format.

#![allow(clippy::unnecessary_wraps)]

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::error::ExecError;
use crate::core::Cpu;
use crate::isa::abi::REG_RA;
use crate::isa::instruction::Instruction;
use crate::isa::registry::{instruction_table, Handler, InstructionSet};

/// Base integer instructions plus the common pseudo-instructions.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rv32i;

impl InstructionSet for Rv32i {
    fn name(&self) -> &'static str {
        "rv32i"
    }

    fn load(&self) -> Vec<(String, Handler)> {
        instruction_table![
            lui, auipc, jal, jalr, beq, bne, blt, bge, bltu, bgeu, lb, lh, lw, lbu, lhu, sb,
            sh, sw, addi, slti, sltiu, xori, ori, andi, slli, srli, srai, add, sub, sll, slt,
            sltu, xor, srl, sra, or, and, fence, fence_i, nop, ret, mv, li, la, j, jr, call,
            beqz, bnez,
        ]
    }
}

/// Applies `op` to `rs1` and the immediate, writing `rd`.
fn reg_imm(
    cpu: &mut Cpu,
    inst: &Instruction,
    op: impl FnOnce(i32, i32) -> i32,
) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let lhs = cpu.regs.read(inst.reg(1)?);
    let imm = inst.imm(2, &cpu.mmu)?;
    cpu.regs.write(rd, op(lhs, imm));
    Ok(())
}

/// Applies `op` to `rs1` and `rs2`, writing `rd`.
fn reg_reg(
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

fn branch(
    cpu: &mut Cpu,
    inst: &Instruction,
    taken: impl FnOnce(i32, i32) -> bool,
) -> Result<(), ExecError> {
    let lhs = cpu.regs.read(inst.reg(0)?);
    let rhs = cpu.regs.read(inst.reg(1)?);
    if taken(lhs, rhs) {
        let target = inst.target(2, cpu.instruction_pc(), &cpu.mmu)?;
        cpu.jump(target)?;
    }
    Ok(())
}

/// Effective address of a load (`[rd, rs1, imm]`) or store (`[rs2, rs1, imm]`).
fn address(cpu: &Cpu, inst: &Instruction) -> Result<u32, ExecError> {
    let base = cpu.regs.read_u(inst.reg(1)?);
    let offset = inst.imm(2, &cpu.mmu)?;
    Ok(base.wrapping_add(offset as u32))
}

const fn shamt(imm: i32) -> u32 {
    (imm as u32) & 0x1F
}

fn lui(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let imm = inst.imm(1, &cpu.mmu)?;
    cpu.regs.write(rd, imm.wrapping_shl(12));
    Ok(())
}

fn auipc(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let imm = inst.imm(1, &cpu.mmu)?;
    let value = cpu.instruction_pc().wrapping_add((imm as u32).wrapping_shl(12));
    cpu.regs.write_u(rd, value);
    Ok(())
}

fn jal(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let target = inst.target(1, cpu.instruction_pc(), &cpu.mmu)?;
    let link = cpu.pc;
    cpu.jump(target)?;
    cpu.regs.write_u(rd, link);
    Ok(())
}

fn jalr(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let base = cpu.regs.read_u(inst.reg(1)?);
    let offset = inst.imm(2, &cpu.mmu)?;
    let link = cpu.pc;
    cpu.jump(base.wrapping_add(offset as u32) & !1)?;
    cpu.regs.write_u(rd, link);
    Ok(())
}

fn beq(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    branch(cpu, inst, |a, b| a == b)
}

fn bne(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    branch(cpu, inst, |a, b| a != b)
}

fn blt(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    branch(cpu, inst, |a, b| a < b)
}

fn bge(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    branch(cpu, inst, |a, b| a >= b)
}

fn bltu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    branch(cpu, inst, |a, b| (a as u32) < (b as u32))
}

fn bgeu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    branch(cpu, inst, |a, b| (a as u32) >= (b as u32))
}

fn lb(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let addr = address(cpu, inst)?;
    let value = cpu.mmu.read_u8(addr)? as i8;
    cpu.regs.write(rd, i32::from(value));
    Ok(())
}

fn lh(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let addr = address(cpu, inst)?;
    let value = cpu.mmu.read_u16(addr)? as i16;
    cpu.regs.write(rd, i32::from(value));
    Ok(())
}

fn lw(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let addr = address(cpu, inst)?;
    let value = cpu.mmu.read_u32(addr)?;
    cpu.regs.write_u(rd, value);
    Ok(())
}

fn lbu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let addr = address(cpu, inst)?;
    let value = cpu.mmu.read_u8(addr)?;
    cpu.regs.write_u(rd, u32::from(value));
    Ok(())
}

fn lhu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let addr = address(cpu, inst)?;
    let value = cpu.mmu.read_u16(addr)?;
    cpu.regs.write_u(rd, u32::from(value));
    Ok(())
}

fn sb(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let value = cpu.regs.read_u(inst.reg(0)?);
    let addr = address(cpu, inst)?;
    cpu.mmu.write_u8(addr, value as u8)?;
    Ok(())
}

fn sh(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let value = cpu.regs.read_u(inst.reg(0)?);
    let addr = address(cpu, inst)?;
    cpu.mmu.write_u16(addr, value as u16)?;
    Ok(())
}

fn sw(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let value = cpu.regs.read_u(inst.reg(0)?);
    let addr = address(cpu, inst)?;
    cpu.mmu.write_u32(addr, value)?;
    Ok(())
}

fn addi(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_imm(cpu, inst, i32::wrapping_add)
}

fn slti(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_imm(cpu, inst, |a, b| i32::from(a < b))
}

fn sltiu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_imm(cpu, inst, |a, b| i32::from((a as u32) < (b as u32)))
}

fn xori(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_imm(cpu, inst, |a, b| a ^ b)
}

fn ori(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_imm(cpu, inst, |a, b| a | b)
}

fn andi(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_imm(cpu, inst, |a, b| a & b)
}

fn slli(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_imm(cpu, inst, |a, b| ((a as u32) << shamt(b)) as i32)
}

fn srli(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_imm(cpu, inst, |a, b| ((a as u32) >> shamt(b)) as i32)
}

fn srai(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_imm(cpu, inst, |a, b| a >> shamt(b))
}

fn add(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, i32::wrapping_add)
}

fn sub(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, i32::wrapping_sub)
}

fn sll(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, |a, b| ((a as u32) << shamt(b)) as i32)
}

fn slt(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, |a, b| i32::from(a < b))
}

fn sltu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, |a, b| i32::from((a as u32) < (b as u32)))
}

fn xor(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, |a, b| a ^ b)
}

fn srl(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, |a, b| ((a as u32) >> shamt(b)) as i32)
}

fn sra(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, |a, b| a >> shamt(b))
}

fn or(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, |a, b| a | b)
}

fn and(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    reg_reg(cpu, inst, |a, b| a & b)
}

// A single in-order hart observes its own accesses in program order.
fn fence(_cpu: &mut Cpu, _inst: &Instruction) -> Result<(), ExecError> {
    Ok(())
}

// Decoded instructions are invalidated on every write to their section.
fn fence_i(_cpu: &mut Cpu, _inst: &Instruction) -> Result<(), ExecError> {
    Ok(())
}

fn nop(_cpu: &mut Cpu, _inst: &Instruction) -> Result<(), ExecError> {
    Ok(())
}

fn ret(cpu: &mut Cpu, _inst: &Instruction) -> Result<(), ExecError> {
    let target = cpu.regs.read_u(REG_RA) & !1;
    cpu.jump(target)
}

fn mv(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let value = cpu.regs.read(inst.reg(1)?);
    cpu.regs.write(rd, value);
    Ok(())
}

fn li(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let value = inst.imm(1, &cpu.mmu)?;
    cpu.regs.write(rd, value);
    Ok(())
}

fn la(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    // Literals are absolute addresses, not pc-relative offsets.
    let addr = inst.imm(1, &cpu.mmu)?;
    cpu.regs.write(rd, addr);
    Ok(())
}

fn j(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let target = inst.target(0, cpu.instruction_pc(), &cpu.mmu)?;
    cpu.jump(target)
}

fn jr(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let target = cpu.regs.read_u(inst.reg(0)?) & !1;
    cpu.jump(target)
}

fn call(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let target = inst.target(0, cpu.instruction_pc(), &cpu.mmu)?;
    let link = cpu.instruction_pc().wrapping_add(INSTRUCTION_SIZE);
    cpu.jump(target)?;
    cpu.regs.write_u(REG_RA, link);
    Ok(())
}

fn zero_branch(
    cpu: &mut Cpu,
    inst: &Instruction,
    taken: impl FnOnce(i32) -> bool,
) -> Result<(), ExecError> {
    let value = cpu.regs.read(inst.reg(0)?);
    if taken(value) {
        let target = inst.target(1, cpu.instruction_pc(), &cpu.mmu)?;
        cpu.jump(target)?;
    }
    Ok(())
}

fn beqz(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    zero_branch(cpu, inst, |v| v == 0)
}

fn bnez(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    zero_branch(cpu, inst, |v| v != 0)
}
