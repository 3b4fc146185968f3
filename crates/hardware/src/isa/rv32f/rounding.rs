//! Floating-point rounding mode support.
//!
//! | Value | Mode | Description                             |
//! |-------|------|-----------------------------------------|
//! | 0b000 | RNE  | Round to Nearest, ties to Even          |
//! | 0b001 | RTZ  | Round towards Zero                      |
//! | 0b010 | RDN  | Round Down (towards -inf)               |
//! | 0b011 | RUP  | Round Up (towards +inf)                 |
//! | 0b100 | RMM  | Round to Nearest, ties to Max Magnitude |
//!
//! The host computes arithmetic in round-to-nearest-even. The selected mode is honoured
//! exactly by float-to-integer conversions.

use super::flags::FpFlags;
use crate::isa::instruction::ROUNDING_DYNAMIC;

/// RISC-V rounding mode encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RoundingMode {
    /// Round to Nearest, ties to Even (default IEEE mode).
    Rne = 0b000,
    /// Round towards Zero.
    Rtz = 0b001,
    /// Round Down (towards -inf).
    Rdn = 0b010,
    /// Round Up (towards +inf).
    Rup = 0b011,
    /// Round to Nearest, ties to Max Magnitude.
    Rmm = 0b100,
}

impl RoundingMode {
    /// Decodes a 3-bit rounding mode field.
    ///
    /// Returns `None` for the reserved encodings and the dynamic sentinel.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits & 0x7 {
            0b000 => Some(Self::Rne),
            0b001 => Some(Self::Rtz),
            0b010 => Some(Self::Rdn),
            0b011 => Some(Self::Rup),
            0b100 => Some(Self::Rmm),
            _ => None,
        }
    }

    /// Resolves an instruction's field against the dynamic mode in `frm`.
    ///
    /// `None` means the combination is reserved and the instruction is illegal.
    pub const fn resolve(field: u32, frm: u32) -> Option<Self> {
        if field == ROUNDING_DYNAMIC {
            Self::from_bits(frm)
        } else {
            Self::from_bits(field)
        }
    }

    /// Rounds `value` to an integral value.
    pub fn round(self, value: f64) -> f64 {
        match self {
            Self::Rne => value.round_ties_even(),
            Self::Rtz => value.trunc(),
            Self::Rdn => value.floor(),
            Self::Rup => value.ceil(),
            Self::Rmm => value.round(),
        }
    }
}

/// Converts to a signed word. NaN and positive overflow saturate to `i32::MAX`.
#[allow(clippy::float_cmp)]
pub fn to_i32(value: f64, mode: RoundingMode) -> (i32, FpFlags) {
    if value.is_nan() {
        return (i32::MAX, FpFlags::NV);
    }
    let rounded = mode.round(value);
    if rounded > f64::from(i32::MAX) {
        return (i32::MAX, FpFlags::NV);
    }
    if rounded < f64::from(i32::MIN) {
        return (i32::MIN, FpFlags::NV);
    }
    let flags = if rounded == value {
        FpFlags::NONE
    } else {
        FpFlags::NX
    };
    (rounded as i32, flags)
}

/// Converts to an unsigned word. NaN and positive overflow saturate to `u32::MAX`.
#[allow(clippy::float_cmp)]
pub fn to_u32(value: f64, mode: RoundingMode) -> (u32, FpFlags) {
    if value.is_nan() {
        return (u32::MAX, FpFlags::NV);
    }
    let rounded = mode.round(value);
    if rounded > f64::from(u32::MAX) {
        return (u32::MAX, FpFlags::NV);
    }
    if rounded < 0.0 {
        return (0, FpFlags::NV);
    }
    let flags = if rounded == value {
        FpFlags::NONE
    } else {
        FpFlags::NX
    };
    (rounded as u32, flags)
}
