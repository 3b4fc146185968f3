//! RISC-V Single-Precision Floating-Point (F) Opcodes.
//!
//! The D extension reuses every one of these major opcodes.

/// Floating-point load (FLW, FLD).
pub const OP_LOAD_FP: u32 = 0b00001;

/// Floating-point store (FSW, FSD).
pub const OP_STORE_FP: u32 = 0b01001;

/// Fused multiply-add.
pub const OP_FMADD: u32 = 0b10000;

/// Fused multiply-subtract.
pub const OP_FMSUB: u32 = 0b10001;

/// Negated fused multiply-subtract.
pub const OP_FNMSUB: u32 = 0b10010;

/// Negated fused multiply-add.
pub const OP_FNMADD: u32 = 0b10011;

/// Floating-point arithmetic, comparison and conversion.
pub const OP_FP: u32 = 0b10100;

/// R4 `fmt` field for single precision.
pub const FMT_S: u32 = 0b00;

/// R4 `fmt` field for double precision.
pub const FMT_D: u32 = 0b01;
