//! RISC-V Base Integer (I) Major Opcodes.
//!
//! Values are bits 6-2 of the instruction word; the low two bits are always `0b11`.

/// Load instructions (LB, LH, LW, LBU, LHU).
pub const OP_LOAD: u32 = 0b00000;

/// Memory ordering (FENCE, FENCE.I).
pub const OP_MISC_MEM: u32 = 0b00011;

/// Register-immediate arithmetic.
pub const OP_IMM: u32 = 0b00100;

/// Add Upper Immediate to PC.
pub const OP_AUIPC: u32 = 0b00101;

/// Store instructions (SB, SH, SW).
pub const OP_STORE: u32 = 0b01000;

/// Register-register arithmetic.
pub const OP_REG: u32 = 0b01100;

/// Load Upper Immediate.
pub const OP_LUI: u32 = 0b01101;

/// Conditional branches.
pub const OP_BRANCH: u32 = 0b11000;

/// Jump and Link Register.
pub const OP_JALR: u32 = 0b11001;

/// Jump and Link.
pub const OP_JAL: u32 = 0b11011;
