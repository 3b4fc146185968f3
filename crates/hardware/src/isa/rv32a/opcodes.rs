//! RISC-V Atomic (A) Opcodes.

/// Atomic memory operation major opcode (bits 6-2 of `0b0101111`).
pub const OP_AMO: u32 = 0b01011;

/// `funct3` for word-sized atomics.
pub const WIDTH_WORD: u32 = 0b010;
