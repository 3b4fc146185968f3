//! Precision-generic view of the floating-point register file.
//!
//! `f32` and `f64` implement `Float`, so the F and D handlers share one body per
//! operation.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::core::Cpu;

/// `fclass` result bits.
pub mod class {
    /// Negative infinity.
    pub const NEG_INF: u32 = 1 << 0;
    /// Negative normal number.
    pub const NEG_NORMAL: u32 = 1 << 1;
    /// Negative subnormal number.
    pub const NEG_SUBNORMAL: u32 = 1 << 2;
    /// Negative zero.
    pub const NEG_ZERO: u32 = 1 << 3;
    /// Positive zero.
    pub const POS_ZERO: u32 = 1 << 4;
    /// Positive subnormal number.
    pub const POS_SUBNORMAL: u32 = 1 << 5;
    /// Positive normal number.
    pub const POS_NORMAL: u32 = 1 << 6;
    /// Positive infinity.
    pub const POS_INF: u32 = 1 << 7;
    /// Signaling NaN.
    pub const SIGNALING_NAN: u32 = 1 << 8;
    /// Quiet NaN.
    pub const QUIET_NAN: u32 = 1 << 9;
}

/// A floating-point precision the hart can compute in.
pub trait Float:
    Copy
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Canonical quiet NaN (positive, zero payload).
    const CANONICAL_NAN: Self;
    /// Positive zero.
    const ZERO: Self;
    /// Mask of the sign bit in `to_raw` form.
    const SIGN_BIT: u64;
    /// Mask of the quiet bit in `to_raw` form.
    const QUIET_BIT: u64;

    /// Reads register `idx` at this precision.
    fn read(cpu: &Cpu, idx: usize) -> Self;
    /// Writes register `idx` at this precision.
    fn write(cpu: &mut Cpu, idx: usize, value: Self);

    /// Raw bit pattern, zero-extended.
    fn to_raw(self) -> u64;
    /// Value from a raw bit pattern (truncated to this width).
    fn from_raw(bits: u64) -> Self;

    /// Exact widening.
    fn to_f64(self) -> f64;
    /// Narrowing with round-to-nearest-even.
    fn from_f64(value: f64) -> Self;
    /// Conversion from a signed word.
    fn from_i32(value: i32) -> Self;
    /// Conversion from an unsigned word.
    fn from_u32(value: u32) -> Self;

    /// Whether the value is any NaN.
    fn is_nan(self) -> bool;
    /// Whether the value is an infinity.
    fn is_infinite(self) -> bool;
    /// Whether the value is finite and subnormal.
    fn is_subnormal(self) -> bool;
    /// Square root.
    fn sqrt(self) -> Self;
    /// Fused `self * a + b`.
    fn mul_add(self, a: Self, b: Self) -> Self;

    /// Whether the sign bit is set.
    fn sign(self) -> bool {
        self.to_raw() & Self::SIGN_BIT != 0
    }

    /// Whether the value is a signaling NaN.
    fn is_signaling(self) -> bool {
        self.is_nan() && self.to_raw() & Self::QUIET_BIT == 0
    }

    /// Replaces any NaN by the canonical NaN.
    fn canonical(self) -> Self {
        if self.is_nan() {
            Self::CANONICAL_NAN
        } else {
            self
        }
    }

    /// Magnitude of `self` with the given sign.
    fn with_sign(self, negative: bool) -> Self {
        let magnitude = self.to_raw() & !Self::SIGN_BIT;
        Self::from_raw(if negative {
            magnitude | Self::SIGN_BIT
        } else {
            magnitude
        })
    }

    /// The ten-bit `fclass` mask of the value.
    fn classify(self) -> u32 {
        let negative = self.sign();
        if self.is_nan() {
            return if self.is_signaling() {
                class::SIGNALING_NAN
            } else {
                class::QUIET_NAN
            };
        }
        match (negative, self) {
            (true, v) if v.is_infinite() => class::NEG_INF,
            (false, v) if v.is_infinite() => class::POS_INF,
            (true, v) if v == Self::ZERO => class::NEG_ZERO,
            (false, v) if v == Self::ZERO => class::POS_ZERO,
            (true, v) if v.is_subnormal() => class::NEG_SUBNORMAL,
            (false, v) if v.is_subnormal() => class::POS_SUBNORMAL,
            (true, _) => class::NEG_NORMAL,
            (false, _) => class::POS_NORMAL,
        }
    }
}

impl Float for f32 {
    const CANONICAL_NAN: Self = Self::from_bits(0x7FC0_0000);
    const ZERO: Self = 0.0;
    const SIGN_BIT: u64 = 1 << 31;
    const QUIET_BIT: u64 = 1 << 22;

    fn read(cpu: &Cpu, idx: usize) -> Self {
        cpu.regs.read_f32(idx)
    }

    fn write(cpu: &mut Cpu, idx: usize, value: Self) {
        cpu.regs.write_f32(idx, value);
    }

    fn to_raw(self) -> u64 {
        u64::from(self.to_bits())
    }

    fn from_raw(bits: u64) -> Self {
        Self::from_bits(bits as u32)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(value: f64) -> Self {
        value as Self
    }

    fn from_i32(value: i32) -> Self {
        value as Self
    }

    fn from_u32(value: u32) -> Self {
        value as Self
    }

    fn is_nan(self) -> bool {
        Self::is_nan(self)
    }

    fn is_infinite(self) -> bool {
        Self::is_infinite(self)
    }

    fn is_subnormal(self) -> bool {
        Self::is_subnormal(self)
    }

    fn sqrt(self) -> Self {
        Self::sqrt(self)
    }

    fn mul_add(self, a: Self, b: Self) -> Self {
        Self::mul_add(self, a, b)
    }
}

impl Float for f64 {
    const CANONICAL_NAN: Self = Self::from_bits(0x7FF8_0000_0000_0000);
    const ZERO: Self = 0.0;
    const SIGN_BIT: u64 = 1 << 63;
    const QUIET_BIT: u64 = 1 << 51;

    fn read(cpu: &Cpu, idx: usize) -> Self {
        cpu.regs.read_f64(idx)
    }

    fn write(cpu: &mut Cpu, idx: usize, value: Self) {
        cpu.regs.write_f64(idx, value);
    }

    fn to_raw(self) -> u64 {
        self.to_bits()
    }

    fn from_raw(bits: u64) -> Self {
        Self::from_bits(bits)
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn from_i32(value: i32) -> Self {
        Self::from(value)
    }

    fn from_u32(value: u32) -> Self {
        Self::from(value)
    }

    fn is_nan(self) -> bool {
        Self::is_nan(self)
    }

    fn is_infinite(self) -> bool {
        Self::is_infinite(self)
    }

    fn is_subnormal(self) -> bool {
        Self::is_subnormal(self)
    }

    fn sqrt(self) -> Self {
        Self::sqrt(self)
    }

    fn mul_add(self, a: Self, b: Self) -> Self {
        Self::mul_add(self, a, b)
    }
}
