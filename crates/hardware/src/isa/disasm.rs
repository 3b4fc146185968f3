//! Instruction Disassembler.
//!
//! Renders instructions as assembly text for traces, fault reports and test
//! diagnostics. Raw instructions render from their decoded fields in the layout of
//! their format; structured ones print their tokens verbatim.
//!
//! ```
//! use rv32hart_core::isa::disasm::disassemble;
//! assert_eq!(disassemble(0x00A0_0513), "addi a0, zero, 10");
//! ```

use std::fmt;

use crate::core::arch::csr::csr_name;
use crate::isa::abi::{fpr_name, gpr_name};
use crate::isa::decode::decode;
use crate::isa::instruction::{DecodedInstruction, Format, Instruction};

/// Disassembles a 32-bit word; undecodable words render as `.word 0x...`.
pub fn disassemble(word: u32) -> String {
    decode(word).map_or_else(
        |_| format!(".word {word:#010x}"),
        |decoded| render(&decoded),
    )
}

fn register(decoded: &DecodedInstruction, index: usize) -> String {
    let value = decoded.operands.get(index).copied().unwrap_or(0);
    let idx = usize::try_from(value).unwrap_or(usize::MAX);
    if decoded.fregs & (1 << index) != 0 {
        fpr_name(idx).to_string()
    } else {
        gpr_name(idx).to_string()
    }
}

fn csr(decoded: &DecodedInstruction, index: usize) -> String {
    let addr = decoded.operands.get(index).copied().unwrap_or(0) as u32;
    csr_name(addr).map_or_else(|| format!("{addr:#05x}"), str::to_string)
}

fn render(decoded: &DecodedInstruction) -> String {
    let m = decoded.mnemonic;
    let r = |i: usize| register(decoded, i);
    let imm = |i: usize| decoded.operands.get(i).copied().unwrap_or(0);
    match decoded.format {
        Format::R => format!("{m} {}, {}, {}", r(0), r(1), r(2)),
        Format::RUnary => format!("{m} {}, {}", r(0), r(1)),
        Format::R4 => format!("{m} {}, {}, {}, {}", r(0), r(1), r(2), r(3)),
        Format::I | Format::Shift => format!("{m} {}, {}, {}", r(0), r(1), imm(2)),
        Format::Load | Format::S => format!("{m} {}, {}({})", r(0), imm(2), r(1)),
        Format::B => format!("{m} {}, {}, {}", r(0), r(1), imm(2)),
        Format::U => format!("{m} {}, {:#x}", r(0), (imm(1) as u32) & 0xF_FFFF),
        Format::J => format!("{m} {}, {}", r(0), imm(1)),
        Format::Csr => format!("{m} {}, {}, {}", r(0), csr(decoded, 1), r(2)),
        Format::CsrImm => format!("{m} {}, {}, {}", r(0), csr(decoded, 1), imm(2)),
        Format::Amo => format!("{m} {}, {}, ({})", r(0), r(2), r(1)),
        Format::Lr => format!("{m} {}, ({})", r(0), r(1)),
        Format::Fence | Format::Fixed => m.to_string(),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured { mnemonic, operands } if operands.is_empty() => {
                f.write_str(mnemonic)
            }
            Self::Structured { mnemonic, operands } => {
                write!(f, "{mnemonic} {}", operands.join(", "))
            }
            Self::Raw(decoded) => f.write_str(&render(decoded)),
        }
    }
}
