//! RISC-V Double-Precision (D) Function Codes (funct7).
//!
//! Each code is the single-precision one with `fmt = 01`.

use crate::isa::rv32f::funct7 as single;

/// Format bit distinguishing double precision.
const D: u32 = 0b01;

/// Add.
pub const FADD: u32 = single::FADD | D;
/// Subtract.
pub const FSUB: u32 = single::FSUB | D;
/// Multiply.
pub const FMUL: u32 = single::FMUL | D;
/// Divide.
pub const FDIV: u32 = single::FDIV | D;
/// Square root.
pub const FSQRT: u32 = single::FSQRT | D;
/// Sign injection.
pub const FSGNJ: u32 = single::FSGNJ | D;
/// Minimum / Maximum.
pub const FMIN_MAX: u32 = single::FMIN_MAX | D;
/// Convert to integer.
pub const FCVT_W: u32 = single::FCVT_W | D;
/// Classify.
pub const FCLASS: u32 = single::FMV_X_CLASS | D;
/// Compare.
pub const FCMP: u32 = single::FCMP | D;
/// Convert from integer.
pub const FCVT_FROM_W: u32 = single::FCVT_FROM_W | D;
/// Narrow to single precision (`rs2` = 1).
pub const FCVT_S_D: u32 = single::FCVT_FMT;
/// Widen to double precision (`rs2` = 0).
pub const FCVT_D_S: u32 = single::FCVT_FMT | D;
