//! RISC-V Multiply/Divide (M) Function Codes (funct3).

/// Multiply (low 32 bits).
pub const MUL: u32 = 0b000;
/// Multiply High (signed x signed).
pub const MULH: u32 = 0b001;
/// Multiply High (signed x unsigned).
pub const MULHSU: u32 = 0b010;
/// Multiply High (unsigned x unsigned).
pub const MULHU: u32 = 0b011;
/// Divide (signed).
pub const DIV: u32 = 0b100;
/// Divide (unsigned).
pub const DIVU: u32 = 0b101;
/// Remainder (signed).
pub const REM: u32 = 0b110;
/// Remainder (unsigned).
pub const REMU: u32 = 0b111;
