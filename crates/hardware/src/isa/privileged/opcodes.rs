//! RISC-V Privileged Architecture Opcodes.
//!
//! Defines the major opcode and the fixed encodings of the system instructions, plus the
//! few hot words the decoder recognises before consulting its tables.

/// System major opcode (bits 6-2 of `0b1110011`).
/// Used for CSR instructions, ECALL, EBREAK, xRET and WFI.
pub const OP_SYSTEM: u32 = 0b11100;

/// `funct3` shared by every non-CSR system instruction.
pub const FUNCT3_PRIV: u32 = 0b000;

/// Environment Call (ECALL).
pub const ECALL: u32 = 0x0000_0073;

/// Environment Break (EBREAK).
pub const EBREAK: u32 = 0x0010_0073;

/// User Return (URET).
pub const URET: u32 = 0x0020_0073;

/// Supervisor Return (SRET).
pub const SRET: u32 = 0x1020_0073;

/// Machine Return (MRET).
pub const MRET: u32 = 0x3020_0073;

/// Wait for Interrupt (WFI).
pub const WFI: u32 = 0x1050_0073;

/// `addi x0, x0, 0`.
pub const NOP: u32 = 0x0000_0013;

/// `jalr x0, 0(ra)`.
pub const RET: u32 = 0x0000_8067;

/// `addi sp, sp, -32`, the usual prologue.
pub const ADDI_SP_NEG32: u32 = 0xFE01_0113;

/// `addi sp, sp, 32`, the matching epilogue.
pub const ADDI_SP_POS32: u32 = 0x0201_0113;
