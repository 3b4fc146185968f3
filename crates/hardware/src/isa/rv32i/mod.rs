//! RISC-V Base Integer Instruction Set (I).
//!
//! Defines the fundamental integer instructions required by any RISC-V implementation.
//!
//! # Structure
//!
//! - `opcodes`: Major opcodes (Load, Store, Branch, Jal, OpImm, OpReg, etc.).
//! - `funct3`: Minor opcodes distinguishing instructions within a major opcode.
//! - `funct7`: Additional opcode bits for R-type instructions.
//! - `execute`: Handlers, including the pseudo-instructions accepted in structured
//!   programs.

/// Function code 3 definitions for base integer operations.
pub mod funct3;

/// Function code 7 definitions for base integer operations.
pub mod funct7;

/// Base integer instruction set opcodes.
pub mod opcodes;

mod execute;

pub use execute::Rv32i;

use crate::isa::decode::{Encoding, Selector};
use crate::isa::instruction::Format;
use opcodes::{
    OP_AUIPC, OP_BRANCH, OP_IMM, OP_JAL, OP_JALR, OP_LOAD, OP_LUI, OP_MISC_MEM, OP_REG, OP_STORE,
};

const fn row(mnemonic: &'static str, opcode: u32, f3: u32, format: Format) -> Encoding {
    Encoding::new(mnemonic, opcode, Some(f3), Selector::None, format)
}

const fn r7(mnemonic: &'static str, opcode: u32, f3: u32, f7: u32, format: Format) -> Encoding {
    Encoding::new(mnemonic, opcode, Some(f3), Selector::Funct7(f7), format)
}

/// Opcode table rows for RV32I.
pub const ENCODINGS: &[Encoding] = &[
    Encoding::new("lui", OP_LUI, None, Selector::None, Format::U),
    Encoding::new("auipc", OP_AUIPC, None, Selector::None, Format::U),
    Encoding::new("jal", OP_JAL, None, Selector::None, Format::J),
    row("jalr", OP_JALR, funct3::JALR, Format::I),
    row("beq", OP_BRANCH, funct3::BEQ, Format::B),
    row("bne", OP_BRANCH, funct3::BNE, Format::B),
    row("blt", OP_BRANCH, funct3::BLT, Format::B),
    row("bge", OP_BRANCH, funct3::BGE, Format::B),
    row("bltu", OP_BRANCH, funct3::BLTU, Format::B),
    row("bgeu", OP_BRANCH, funct3::BGEU, Format::B),
    row("lb", OP_LOAD, funct3::LB, Format::Load),
    row("lh", OP_LOAD, funct3::LH, Format::Load),
    row("lw", OP_LOAD, funct3::LW, Format::Load),
    row("lbu", OP_LOAD, funct3::LBU, Format::Load),
    row("lhu", OP_LOAD, funct3::LHU, Format::Load),
    row("sb", OP_STORE, funct3::SB, Format::S),
    row("sh", OP_STORE, funct3::SH, Format::S),
    row("sw", OP_STORE, funct3::SW, Format::S),
    row("addi", OP_IMM, funct3::ADD_SUB, Format::I),
    row("slti", OP_IMM, funct3::SLT, Format::I),
    row("sltiu", OP_IMM, funct3::SLTU, Format::I),
    row("xori", OP_IMM, funct3::XOR, Format::I),
    row("ori", OP_IMM, funct3::OR, Format::I),
    row("andi", OP_IMM, funct3::AND, Format::I),
    r7("slli", OP_IMM, funct3::SLL, funct7::DEFAULT, Format::Shift),
    r7("srli", OP_IMM, funct3::SRL_SRA, funct7::DEFAULT, Format::Shift),
    r7("srai", OP_IMM, funct3::SRL_SRA, funct7::SUB_SRA, Format::Shift),
    r7("add", OP_REG, funct3::ADD_SUB, funct7::DEFAULT, Format::R),
    r7("sub", OP_REG, funct3::ADD_SUB, funct7::SUB_SRA, Format::R),
    r7("sll", OP_REG, funct3::SLL, funct7::DEFAULT, Format::R),
    r7("slt", OP_REG, funct3::SLT, funct7::DEFAULT, Format::R),
    r7("sltu", OP_REG, funct3::SLTU, funct7::DEFAULT, Format::R),
    r7("xor", OP_REG, funct3::XOR, funct7::DEFAULT, Format::R),
    r7("srl", OP_REG, funct3::SRL_SRA, funct7::DEFAULT, Format::R),
    r7("sra", OP_REG, funct3::SRL_SRA, funct7::SUB_SRA, Format::R),
    r7("or", OP_REG, funct3::OR, funct7::DEFAULT, Format::R),
    r7("and", OP_REG, funct3::AND, funct7::DEFAULT, Format::R),
    row("fence", OP_MISC_MEM, funct3::FENCE, Format::Fence),
    row("fence.i", OP_MISC_MEM, funct3::FENCE_I, Format::Fence),
];
