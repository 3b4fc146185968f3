//! RISC-V Floating-Point Function Codes (funct3).
//!
//! Instructions not listed here carry a rounding mode in `funct3`.

/// Word width for FLW / FSW.
pub const WIDTH_W: u32 = 0b010;
/// Doubleword width for FLD / FSD.
pub const WIDTH_D: u32 = 0b011;

/// Sign injection.
pub const FSGNJ: u32 = 0b000;
/// Negated sign injection.
pub const FSGNJN: u32 = 0b001;
/// XOR sign injection.
pub const FSGNJX: u32 = 0b010;

/// Minimum.
pub const FMIN: u32 = 0b000;
/// Maximum.
pub const FMAX: u32 = 0b001;

/// Less than or equal.
pub const FLE: u32 = 0b000;
/// Less than.
pub const FLT: u32 = 0b001;
/// Equal.
pub const FEQ: u32 = 0b010;

/// Bit move to the integer file.
pub const FMV_X: u32 = 0b000;
/// Classify.
pub const FCLASS: u32 = 0b001;
