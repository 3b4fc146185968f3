//! RISC-V Instruction Decoder.
//!
//! This module turns 32-bit encodings into `DecodedInstruction`s. It provides:
//! 1. **Immediate Reconstruction:** I, S, B, U and J immediates, sign-extended exactly as
//!    the encoding defines them.
//! 2. **Opcode Tables:** The `Encoding` row type and a lookup keyed by major opcode, then
//!    `funct3`, then a per-row selector (`funct7`, atomic `funct5`, float `fmt`, ...).
//! 3. **Fast Paths:** A handful of fixed encodings checked before the tables.
//! 4. **Encoding:** The inverse of decoding, used to build raw programs and in tests.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::common::constants::{ENCODING_LOW_BITS_32, ENCODING_LOW_BITS_MASK};
use crate::common::error::DecodeError;
use crate::isa::instruction::{DecodedInstruction, Format, InstructionBits, ROUNDING_DYNAMIC};
use crate::isa::privileged::opcodes as sys;
use crate::isa::{privileged, rv32a, rv32d, rv32f, rv32i, rv32m, zicsr};

/// Number of significant bits in I-, S- and `funct12` immediates.
const IMM12_BITS: u32 = 12;

/// Number of significant bits in B-Type immediates.
const B_IMM_BITS: u32 = 13;

/// Number of significant bits in U-Type immediates (before the shift by 12).
const U_IMM_BITS: u32 = 20;

/// Number of significant bits in J-Type immediates.
const J_IMM_BITS: u32 = 21;

/// Sign-extends the low `bits` bits of `value`.
///
/// If bit `bits - 1` is set, `2^bits` is subtracted.
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let value = value as i64 & ((1_i64 << bits) - 1);
    if value & (1 << (bits - 1)) != 0 {
        (value - (1 << bits)) as i32
    } else {
        value as i32
    }
}

/// I-Type immediate: bits `[31:20]`.
pub const fn imm_i(word: u32) -> i32 {
    sign_extend(word >> 20, IMM12_BITS)
}

/// S-Type immediate: bits `[31:25]` then `[11:7]`.
pub const fn imm_s(word: u32) -> i32 {
    let high = (word >> 25) & 0x7F;
    let low = (word >> 7) & 0x1F;
    sign_extend((high << 5) | low, IMM12_BITS)
}

/// B-Type immediate: a 13-bit even byte offset from four disjoint ranges.
pub const fn imm_b(word: u32) -> i32 {
    let bit_12 = (word >> 31) & 1;
    let bits_10_5 = (word >> 25) & 0x3F;
    let bits_4_1 = (word >> 8) & 0xF;
    let bit_11 = (word >> 7) & 1;
    sign_extend(
        (bit_12 << 12) | (bit_11 << 11) | (bits_10_5 << 5) | (bits_4_1 << 1),
        B_IMM_BITS,
    )
}

/// U-Type immediate: bits `[31:12]` as a signed 20-bit value.
pub const fn imm_u(word: u32) -> i32 {
    sign_extend(word >> 12, U_IMM_BITS)
}

/// J-Type immediate: a 21-bit even byte offset from four disjoint ranges.
pub const fn imm_j(word: u32) -> i32 {
    let bit_20 = (word >> 31) & 1;
    let bits_10_1 = (word >> 21) & 0x3FF;
    let bit_11 = (word >> 20) & 1;
    let bits_19_12 = (word >> 12) & 0xFF;
    sign_extend(
        (bit_20 << 20) | (bits_19_12 << 12) | (bit_11 << 11) | (bits_10_1 << 1),
        J_IMM_BITS,
    )
}

const fn place_i(imm: i32) -> u32 {
    ((imm as u32) & 0xFFF) << 20
}

const fn place_s(imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 5) & 0x7F) << 25) | ((imm & 0x1F) << 7)
}

const fn place_b(imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 12) & 1) << 31)
        | (((imm >> 5) & 0x3F) << 25)
        | (((imm >> 1) & 0xF) << 8)
        | (((imm >> 11) & 1) << 7)
}

const fn place_u(imm: i32) -> u32 {
    ((imm as u32) & 0xF_FFFF) << 12
}

const fn place_j(imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 20) & 1) << 31)
        | (((imm >> 1) & 0x3FF) << 21)
        | (((imm >> 11) & 1) << 20)
        | (((imm >> 12) & 0xFF) << 12)
}

/// Extra bits that pick one row among those sharing an opcode and `funct3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Opcode and `funct3` suffice.
    None,
    /// `funct7` (bits 31-25).
    Funct7(u32),
    /// `funct7` plus a fixed `rs2` field.
    Funct7Rs2(u32, u32),
    /// Atomic sub-opcode (bits 31-27).
    Funct5(u32),
    /// Atomic sub-opcode plus a fixed `rs2` field.
    Funct5Rs2(u32, u32),
    /// Floating-point format (bits 26-25).
    Fmt(u32),
    /// The whole word.
    Exact(u32),
}

/// One row of the static opcode tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoding {
    /// Mnemonic produced by this row.
    pub mnemonic: &'static str,
    /// Major opcode (bits 6-2).
    pub opcode: u32,
    /// Fixed `funct3`, or `None` when the field is a rounding mode or immediate bits.
    pub funct3: Option<u32>,
    /// Remaining discriminating bits.
    pub selector: Selector,
    /// Operand layout.
    pub format: Format,
    /// Bit `i` set when operand `i` names a floating-point register.
    pub fregs: u8,
}

impl Encoding {
    /// Creates a table row with integer-only register operands.
    pub const fn new(
        mnemonic: &'static str,
        opcode: u32,
        funct3: Option<u32>,
        selector: Selector,
        format: Format,
    ) -> Self {
        Self {
            mnemonic,
            opcode,
            funct3,
            selector,
            format,
            fregs: 0,
        }
    }

    /// Marks which operands are floating-point registers.
    pub const fn with_fregs(mut self, fregs: u8) -> Self {
        self.fregs = fregs;
        self
    }

    /// Whether `word` is an instance of this row.
    pub fn matches(&self, word: u32) -> bool {
        if word.opcode() != self.opcode {
            return false;
        }
        if self.funct3.is_some_and(|f3| word.funct3() != f3) {
            return false;
        }
        match self.selector {
            Selector::None => true,
            Selector::Funct7(f7) => word.funct7() == f7,
            Selector::Funct7Rs2(f7, rs2) => word.funct7() == f7 && word.rs2() as u32 == rs2,
            Selector::Funct5(f5) => word.funct5() == f5,
            Selector::Funct5Rs2(f5, rs2) => word.funct5() == f5 && word.rs2() as u32 == rs2,
            Selector::Fmt(fmt) => word.fmt() == fmt,
            Selector::Exact(exact) => word == exact,
        }
    }

    /// Extracts the operand fields of `word` in format order.
    pub fn operands(&self, word: u32) -> Vec<i32> {
        let rd = word.rd() as i32;
        let rs1 = word.rs1() as i32;
        let rs2 = word.rs2() as i32;
        match self.format {
            Format::R | Format::Amo => vec![rd, rs1, rs2],
            Format::RUnary | Format::Lr => vec![rd, rs1],
            Format::R4 => vec![rd, rs1, rs2, word.rs3() as i32],
            Format::I | Format::Load => vec![rd, rs1, imm_i(word)],
            Format::Shift => vec![rd, rs1, rs2],
            Format::S => vec![rs2, rs1, imm_s(word)],
            Format::B => vec![rs1, rs2, imm_b(word)],
            Format::U => vec![rd, imm_u(word)],
            Format::J => vec![rd, imm_j(word)],
            Format::Csr | Format::CsrImm => vec![rd, word.csr() as i32, rs1],
            Format::Fence | Format::Fixed => Vec::new(),
        }
    }

    /// Builds the encoding of this row with the given operands.
    ///
    /// Missing operands encode as zero; rounding-mode fields encode as dynamic.
    pub fn encode(&self, operands: &[i32]) -> u32 {
        let op = |i: usize| operands.get(i).copied().unwrap_or(0);
        let reg = |i: usize| (op(i) as u32) & 0x1F;

        let funct3 = match (self.funct3, self.format) {
            (Some(f3), _) => f3,
            // Bits 14-12 belong to the immediate.
            (None, Format::U | Format::J) => 0,
            (None, _) => ROUNDING_DYNAMIC,
        };
        let mut word = (self.opcode << 2) | ENCODING_LOW_BITS_32 | (funct3 << 12);
        word |= match self.selector {
            Selector::None => 0,
            Selector::Funct7(f7) => f7 << 25,
            Selector::Funct7Rs2(f7, rs2) => (f7 << 25) | (rs2 << 20),
            Selector::Funct5(f5) => f5 << 27,
            Selector::Funct5Rs2(f5, rs2) => (f5 << 27) | (rs2 << 20),
            Selector::Fmt(fmt) => fmt << 25,
            Selector::Exact(exact) => return exact,
        };
        word | match self.format {
            Format::R | Format::Amo | Format::Shift => {
                (reg(0) << 7) | (reg(1) << 15) | (reg(2) << 20)
            }
            Format::RUnary | Format::Lr => (reg(0) << 7) | (reg(1) << 15),
            Format::R4 => (reg(0) << 7) | (reg(1) << 15) | (reg(2) << 20) | (reg(3) << 27),
            Format::I | Format::Load => (reg(0) << 7) | (reg(1) << 15) | place_i(op(2)),
            Format::S => (reg(0) << 20) | (reg(1) << 15) | place_s(op(2)),
            Format::B => (reg(0) << 15) | (reg(1) << 20) | place_b(op(2)),
            Format::U => (reg(0) << 7) | place_u(op(1)),
            Format::J => (reg(0) << 7) | place_j(op(1)),
            Format::Csr | Format::CsrImm => {
                (reg(0) << 7) | (((op(1) as u32) & 0xFFF) << 20) | (reg(2) << 15)
            }
            Format::Fence | Format::Fixed => 0,
        }
    }
}

/// Every opcode table, in registration order.
pub fn all_encodings() -> impl Iterator<Item = &'static Encoding> {
    [
        rv32i::ENCODINGS,
        rv32m::ENCODINGS,
        rv32a::ENCODINGS,
        rv32f::ENCODINGS,
        rv32d::ENCODINGS,
        zicsr::ENCODINGS,
        privileged::ENCODINGS,
    ]
    .into_iter()
    .flatten()
}

/// Finds the table row for a mnemonic.
pub fn encoding_for(mnemonic: &str) -> Option<&'static Encoding> {
    all_encodings().find(|enc| enc.mnemonic == mnemonic)
}

type OpcodeIndex = HashMap<u32, Vec<&'static Encoding>>;

fn opcode_index() -> &'static OpcodeIndex {
    static INDEX: OnceLock<OpcodeIndex> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut index = OpcodeIndex::new();
        for enc in all_encodings() {
            index.entry(enc.opcode).or_default().push(enc);
        }
        index
    })
}

fn fixed(word: u32) -> Option<DecodedInstruction> {
    let (mnemonic, operands, format) = match word {
        sys::NOP => ("addi", vec![0, 0, 0], Format::I),
        sys::RET => ("jalr", vec![0, 1, 0], Format::I),
        sys::ADDI_SP_NEG32 => ("addi", vec![2, 2, -32], Format::I),
        sys::ADDI_SP_POS32 => ("addi", vec![2, 2, 32], Format::I),
        sys::ECALL => ("ecall", Vec::new(), Format::Fixed),
        sys::EBREAK => ("ebreak", Vec::new(), Format::Fixed),
        sys::MRET => ("mret", Vec::new(), Format::Fixed),
        sys::SRET => ("sret", Vec::new(), Format::Fixed),
        sys::URET => ("uret", Vec::new(), Format::Fixed),
        sys::WFI => ("wfi", Vec::new(), Format::Fixed),
        _ => return None,
    };
    Some(DecodedInstruction {
        mnemonic,
        operands,
        encoding: word,
        format,
        fregs: 0,
    })
}

/// Decodes a 32-bit instruction word.
///
/// # Errors
///
/// `DecodeError::IllegalInstruction` when the low bits mark a compressed encoding or no
/// table row matches.
pub fn decode(word: u32) -> Result<DecodedInstruction, DecodeError> {
    if let Some(decoded) = fixed(word) {
        return Ok(decoded);
    }
    if word & ENCODING_LOW_BITS_MASK != ENCODING_LOW_BITS_32 {
        return Err(DecodeError::IllegalInstruction { word });
    }
    let enc = opcode_index()
        .get(&word.opcode())
        .and_then(|rows| rows.iter().find(|enc| enc.matches(word)))
        .ok_or(DecodeError::IllegalInstruction { word })?;
    Ok(DecodedInstruction {
        mnemonic: enc.mnemonic,
        operands: enc.operands(word),
        encoding: word,
        format: enc.format,
        fregs: enc.fregs,
    })
}
