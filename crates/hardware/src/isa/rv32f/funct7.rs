//! RISC-V Single-Precision (F) Function Codes (funct7).
//!
//! The low two bits are the format; the double-precision code is always `+ 1`.

/// Add.
pub const FADD: u32 = 0b000_0000;
/// Subtract.
pub const FSUB: u32 = 0b000_0100;
/// Multiply.
pub const FMUL: u32 = 0b000_1000;
/// Divide.
pub const FDIV: u32 = 0b000_1100;
/// Square root.
pub const FSQRT: u32 = 0b010_1100;
/// Sign injection.
pub const FSGNJ: u32 = 0b001_0000;
/// Minimum / Maximum.
pub const FMIN_MAX: u32 = 0b001_0100;
/// Convert to integer.
pub const FCVT_W: u32 = 0b110_0000;
/// Move to integer register / Classify.
pub const FMV_X_CLASS: u32 = 0b111_0000;
/// Compare.
pub const FCMP: u32 = 0b101_0000;
/// Convert from integer.
pub const FCVT_FROM_W: u32 = 0b110_1000;
/// Move from integer register.
pub const FMV_W_X: u32 = 0b111_1000;
/// Convert between precisions.
pub const FCVT_FMT: u32 = 0b010_0000;

/// `rs2` selecting a signed integer conversion.
pub const RS2_SIGNED: u32 = 0;
/// `rs2` selecting an unsigned integer conversion.
pub const RS2_UNSIGNED: u32 = 1;
