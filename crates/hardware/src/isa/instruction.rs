//! Instruction representation and operand access.
//!
//! Provides bit extraction for raw encodings and the `Instruction` variant consumed by
//! every handler. It covers:
//! 1. **Field Extraction:** The `InstructionBits` trait over `u32` encodings.
//! 2. **Variants:** Hand-built structured instructions and decoded raw words behind one
//!    interface, so handlers never branch on where an instruction came from.
//! 3. **Operand Access:** Register, immediate, branch-target, CSR and rounding-mode
//!    operands, with symbol resolution for structured immediates.

use crate::common::error::OperandError;
use crate::core::arch::csr::csr_address;
use crate::isa::abi;

/// Bit mask for extracting the 5-bit major opcode field (bits 2-6).
pub const OPCODE_MASK: u32 = 0x1F;
/// Bit mask for extracting a 5-bit register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;
/// Bit mask for extracting the funct5 field (bits 27-31).
pub const FUNCT5_MASK: u32 = 0x1F;
/// Bit mask for extracting the floating-point format field (bits 25-26).
pub const FMT_MASK: u32 = 0x3;
/// Bit mask for extracting the CSR address field (bits 20-31).
pub const CSR_MASK: u32 = 0xFFF;

/// Rounding-mode value selecting the dynamic mode held in `frm`.
pub const ROUNDING_DYNAMIC: u32 = 0b111;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the major opcode (bits 6-2). The two low bits are checked separately.
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the third source register field (bits 27-31, for fused multiply-add).
    fn rs3(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;

    /// Extracts the atomic sub-opcode (bits 27-31).
    fn funct5(&self) -> u32;

    /// Extracts the floating-point format field (bits 25-26).
    fn fmt(&self) -> u32;

    /// Extracts the CSR address field (bits 20-31).
    fn csr(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        (self >> 2) & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs3(&self) -> usize {
        ((self >> 27) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }

    #[inline(always)]
    fn funct5(&self) -> u32 {
        (self >> 27) & FUNCT5_MASK
    }

    #[inline(always)]
    fn fmt(&self) -> u32 {
        (self >> 25) & FMT_MASK
    }

    #[inline(always)]
    fn csr(&self) -> u32 {
        (self >> 20) & CSR_MASK
    }
}

/// Instruction formats, each fixing the order of its decoded operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// `[rd, rs1, rs2]`
    R,
    /// `[rd, rs1]`, with `rs2` fixed by the encoding.
    RUnary,
    /// `[rd, rs1, rs2, rs3]`
    R4,
    /// `[rd, rs1, imm]`
    I,
    /// `[rd, rs1, imm]`, rendered as `rd, imm(rs1)`.
    Load,
    /// `[rd, rs1, shamt]`
    Shift,
    /// `[rs2, rs1, imm]`
    S,
    /// `[rs1, rs2, imm]` with a byte offset.
    B,
    /// `[rd, imm20]`; consumers shift the immediate left by 12.
    U,
    /// `[rd, imm]` with a byte offset.
    J,
    /// `[rd, csr, rs1]`
    Csr,
    /// `[rd, csr, uimm]`
    CsrImm,
    /// `[rd, rs1, rs2]` for atomic memory operations.
    Amo,
    /// `[rd, rs1]` for load-reserved.
    Lr,
    /// No operands; memory-ordering hints are ignored.
    Fence,
    /// No operands; the whole word is the encoding.
    Fixed,
}

/// A raw word after decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Mnemonic from the opcode tables.
    pub mnemonic: &'static str,
    /// Operand fields in format order.
    pub operands: Vec<i32>,
    /// The original 32-bit encoding.
    pub encoding: u32,
    /// Instruction format.
    pub format: Format,
    /// Bit `i` set when operand `i` names a floating-point register.
    pub fregs: u8,
}

/// Resolves label names to absolute addresses.
pub trait SymbolResolver {
    /// Returns the absolute address of `name`, or `None` if it is not a known symbol.
    fn resolve_symbol(&self, name: &str) -> Option<u32>;
}

/// Resolver that knows no symbols.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSymbols;

impl SymbolResolver for NoSymbols {
    fn resolve_symbol(&self, _name: &str) -> Option<u32> {
        None
    }
}

/// An instruction ready for dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// A hand-built instruction whose operands are textual tokens.
    Structured {
        /// Mnemonic.
        mnemonic: String,
        /// Operand tokens, in the same order as the decoded form.
        operands: Vec<String>,
    },
    /// A decoded raw word.
    Raw(DecodedInstruction),
}

impl From<DecodedInstruction> for Instruction {
    fn from(decoded: DecodedInstruction) -> Self {
        Self::Raw(decoded)
    }
}

/// Parses a numeric literal: decimal, `0x` hex or `0b` binary, optionally negative.
///
/// Values up to `u32::MAX` are accepted and reinterpreted as two's complement.
pub fn parse_literal(token: &str) -> Option<i32> {
    let (negative, body) = token
        .strip_prefix('-')
        .map_or((false, token), |rest| (true, rest));
    let body = body.replace('_', "");
    let magnitude = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = body
        .strip_prefix("0b")
        .or_else(|| body.strip_prefix("0B"))
    {
        i64::from_str_radix(bin, 2).ok()?
    } else {
        body.parse::<i64>().ok()?
    };
    let value = if negative { -magnitude } else { magnitude };
    if value < i64::from(i32::MIN) || value > i64::from(u32::MAX) {
        return None;
    }
    Some(value as i32)
}

/// Parses a rounding-mode name.
pub fn parse_rounding_mode(token: &str) -> Option<u32> {
    match token {
        "rne" => Some(0b000),
        "rtz" => Some(0b001),
        "rdn" => Some(0b010),
        "rup" => Some(0b011),
        "rmm" => Some(0b100),
        "dyn" => Some(ROUNDING_DYNAMIC),
        _ => None,
    }
}

impl Instruction {
    /// Builds a structured instruction from string tokens.
    pub fn structured(mnemonic: &str, operands: &[&str]) -> Self {
        Self::Structured {
            mnemonic: mnemonic.to_string(),
            operands: operands.iter().map(|op| (*op).to_string()).collect(),
        }
    }

    /// The instruction mnemonic.
    pub fn mnemonic(&self) -> &str {
        match self {
            Self::Structured { mnemonic, .. } => mnemonic,
            Self::Raw(decoded) => decoded.mnemonic,
        }
    }

    /// Number of operands.
    pub fn operand_count(&self) -> usize {
        match self {
            Self::Structured { operands, .. } => operands.len(),
            Self::Raw(decoded) => decoded.operands.len(),
        }
    }

    /// Raw encoding, if the instruction came from a decoded word.
    pub const fn encoding(&self) -> Option<u32> {
        match self {
            Self::Structured { .. } => None,
            Self::Raw(decoded) => Some(decoded.encoding),
        }
    }

    fn missing(&self, index: usize) -> OperandError {
        OperandError::Missing {
            mnemonic: self.mnemonic().to_string(),
            index,
        }
    }

    fn token(&self, index: usize) -> Result<&str, OperandError> {
        match self {
            Self::Structured { operands, .. } => operands
                .get(index)
                .map(String::as_str)
                .ok_or_else(|| self.missing(index)),
            Self::Raw(_) => Err(self.missing(index)),
        }
    }

    fn field(&self, index: usize) -> Result<i32, OperandError> {
        match self {
            Self::Raw(decoded) => decoded
                .operands
                .get(index)
                .copied()
                .ok_or_else(|| self.missing(index)),
            Self::Structured { .. } => Err(self.missing(index)),
        }
    }

    fn register_field(&self, index: usize) -> Option<usize> {
        self.field(index)
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|idx| *idx < 32)
    }

    /// Integer register operand.
    pub fn reg(&self, index: usize) -> Result<usize, OperandError> {
        match self {
            Self::Structured { .. } => {
                let token = self.token(index)?;
                abi::gpr_index(token).ok_or_else(|| OperandError::NotARegister {
                    token: token.to_string(),
                })
            }
            Self::Raw(_) => {
                let value = self.field(index)?;
                self.register_field(index)
                    .ok_or_else(|| OperandError::NotARegister {
                        token: value.to_string(),
                    })
            }
        }
    }

    /// Floating-point register operand.
    pub fn freg(&self, index: usize) -> Result<usize, OperandError> {
        match self {
            Self::Structured { .. } => {
                let token = self.token(index)?;
                abi::fpr_index(token).ok_or_else(|| OperandError::NotAFloatRegister {
                    token: token.to_string(),
                })
            }
            Self::Raw(_) => {
                let value = self.field(index)?;
                self.register_field(index)
                    .ok_or_else(|| OperandError::NotAFloatRegister {
                        token: value.to_string(),
                    })
            }
        }
    }

    /// Immediate operand.
    ///
    /// Structured tokens are looked up as symbols first and parsed as literals only if
    /// no symbol matches.
    pub fn imm(&self, index: usize, symbols: &dyn SymbolResolver) -> Result<i32, OperandError> {
        match self {
            Self::Structured { .. } => {
                let token = self.token(index)?;
                symbols
                    .resolve_symbol(token)
                    .map(|addr| addr as i32)
                    .or_else(|| parse_literal(token))
                    .ok_or_else(|| OperandError::NotAnImmediate {
                        token: token.to_string(),
                    })
            }
            Self::Raw(_) => self.field(index),
        }
    }

    /// Absolute branch or jump target.
    ///
    /// Numeric operands are offsets from `pc`, the address of this instruction.
    /// Symbolic operands already name the absolute destination.
    pub fn target(
        &self,
        index: usize,
        pc: u32,
        symbols: &dyn SymbolResolver,
    ) -> Result<u32, OperandError> {
        if let Self::Structured { .. } = self {
            let token = self.token(index)?;
            if let Some(addr) = symbols.resolve_symbol(token) {
                return Ok(addr);
            }
        }
        let offset = match self {
            Self::Structured { .. } => {
                let token = self.token(index)?;
                parse_literal(token).ok_or_else(|| OperandError::NotAnImmediate {
                    token: token.to_string(),
                })?
            }
            Self::Raw(_) => self.field(index)?,
        };
        Ok(pc.wrapping_add(offset as u32))
    }

    /// CSR address operand, by name or number.
    pub fn csr(&self, index: usize) -> Result<u32, OperandError> {
        match self {
            Self::Structured { .. } => {
                let token = self.token(index)?;
                csr_address(token)
                    .or_else(|| parse_literal(token).map(|v| (v as u32) & CSR_MASK))
                    .ok_or_else(|| OperandError::NotACsr {
                        token: token.to_string(),
                    })
            }
            Self::Raw(_) => Ok((self.field(index)? as u32) & CSR_MASK),
        }
    }

    /// Static rounding mode of a floating-point instruction.
    ///
    /// Raw words carry it in `funct3`. Structured instructions may append a mode name
    /// at `index`; without one the dynamic mode is selected.
    pub fn rounding_mode(&self, index: usize) -> Result<u32, OperandError> {
        match self {
            Self::Raw(decoded) => Ok(decoded.encoding.funct3()),
            Self::Structured { operands, .. } => match operands.get(index) {
                None => Ok(ROUNDING_DYNAMIC),
                Some(token) => {
                    parse_rounding_mode(token).ok_or_else(|| OperandError::NotAnImmediate {
                        token: token.clone(),
                    })
                }
            },
        }
    }
}
