//! Instruction builders.
//!
//! Raw words come from the decoder's own opcode tables, so a test can write
//! `encode("addi", &[10, 0, 5])` instead of packing fields by hand.

use rv32hart_core::isa::decode::encoding_for;
use rv32hart_core::isa::instruction::Instruction;

/// Encodes `mnemonic` with operands in decoded order.
///
/// # Panics
///
/// If the mnemonic has no encoding row.
pub fn encode(mnemonic: &str, operands: &[i32]) -> u32 {
    encoding_for(mnemonic)
        .unwrap_or_else(|| panic!("no encoding for `{mnemonic}`"))
        .encode(operands)
}

/// Parses assembly-like text (`"addi a0, zero, 1"`) into a structured instruction.
pub fn structured(text: &str) -> Instruction {
    let text = text.trim();
    let (mnemonic, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let operands: Vec<&str> = rest
        .split(',')
        .map(str::trim)
        .filter(|op| !op.is_empty())
        .collect();
    Instruction::structured(mnemonic, &operands)
}

/// Parses a listing, one instruction per line; blank lines are skipped.
pub fn listing(text: &str) -> Vec<Instruction> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(structured)
        .collect()
}
