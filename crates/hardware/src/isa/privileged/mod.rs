//! Privileged Architecture Definitions.
//!
//! Defines trap cause codes, the system opcodes, and the handlers for the
//! environment-call, breakpoint, trap-return and wait-for-interrupt instructions.
//!
//! # Modules
//!
//! - `cause`: Exception and Interrupt cause codes.
//! - `opcodes`: System instruction opcodes (ECALL, EBREAK, xRET).

/// Exception and interrupt cause code definitions.
pub mod cause;

/// System instruction opcodes (ECALL, EBREAK, xRET, WFI).
pub mod opcodes;

mod system;

pub use system::System;

use crate::isa::decode::{Encoding, Selector};
use crate::isa::instruction::Format;
use opcodes::{EBREAK, ECALL, FUNCT3_PRIV, MRET, OP_SYSTEM, SRET, URET, WFI};

const fn fixed(mnemonic: &'static str, word: u32) -> Encoding {
    Encoding::new(
        mnemonic,
        OP_SYSTEM,
        Some(FUNCT3_PRIV),
        Selector::Exact(word),
        Format::Fixed,
    )
}

/// Opcode table rows for the privileged instructions.
pub const ENCODINGS: &[Encoding] = &[
    fixed("ecall", ECALL),
    fixed("ebreak", EBREAK),
    fixed("uret", URET),
    fixed("sret", SRET),
    fixed("mret", MRET),
    fixed("wfi", WFI),
];
