//! RISC-V Floating-Point Register File.
//!
//! This module implements the Floating-Point Register (FPR) file. It performs the following:
//! 1. **Storage:** Maintains 32 floating-point registers (`f0`-`f31`) as raw bit patterns.
//! 2. **Width:** Registers are either 32 or 64 bits wide, fixed per machine.
//! 3. **Bitcasts:** Moving a value between widths reinterprets bits (zero-extend or
//!    truncate to the low word); there is never a numeric conversion.

use serde::Deserialize;

use crate::common::constants::REGISTER_COUNT;

/// Floating-point register width (`FLEN`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub enum FloatWidth {
    /// 32-bit registers (F extension only).
    F32,
    /// 64-bit registers (F and D extensions).
    #[default]
    F64,
}

impl FloatWidth {
    /// Width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::F32 => 32,
            Self::F64 => 64,
        }
    }

    const fn mask(self) -> u64 {
        match self {
            Self::F32 => 0xFFFF_FFFF,
            Self::F64 => u64::MAX,
        }
    }
}

impl TryFrom<u32> for FloatWidth {
    type Error = String;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(Self::F32),
            64 => Ok(Self::F64),
            other => Err(format!("flen must be 32 or 64, got {other}")),
        }
    }
}

/// A floating-point value at a specific precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FloatValue {
    /// Single precision.
    Single(f32),
    /// Double precision.
    Double(f64),
}

impl FloatValue {
    /// Raw bit pattern, zero-extended to 64 bits for singles.
    pub fn to_bits(self) -> u64 {
        match self {
            Self::Single(v) => u64::from(v.to_bits()),
            Self::Double(v) => v.to_bits(),
        }
    }
}

/// Floating-Point Register file.
#[derive(Clone, Debug)]
pub struct Fpr {
    regs: [u64; REGISTER_COUNT],
    width: FloatWidth,
}

impl Fpr {
    /// Creates a new floating-point register file of the given width, zeroed.
    pub const fn new(width: FloatWidth) -> Self {
        Self {
            regs: [0; REGISTER_COUNT],
            width,
        }
    }

    /// Configured register width.
    pub const fn width(&self) -> FloatWidth {
        self.width
    }

    /// Reads a register as raw bits at the configured width.
    pub fn read_bits(&self, idx: usize) -> u64 {
        self.regs.get(idx).copied().unwrap_or(0)
    }

    /// Writes raw bits, truncated to the configured width.
    pub fn write_bits(&mut self, idx: usize, bits: u64) {
        if let Some(slot) = self.regs.get_mut(idx) {
            *slot = bits & self.width.mask();
        }
    }

    /// Reads the low 32 bits as a single-precision value.
    pub fn read_f32(&self, idx: usize) -> f32 {
        #[allow(clippy::cast_possible_truncation)]
        f32::from_bits(self.read_bits(idx) as u32)
    }

    /// Writes a single-precision value, zero-extended to the register width.
    pub fn write_f32(&mut self, idx: usize, val: f32) {
        self.write_bits(idx, u64::from(val.to_bits()));
    }

    /// Reads the register as a double-precision value.
    ///
    /// On a 32-bit file the stored word is zero-extended before reinterpretation.
    pub fn read_f64(&self, idx: usize) -> f64 {
        f64::from_bits(self.read_bits(idx))
    }

    /// Writes a double-precision value, truncated to the low word on a 32-bit file.
    pub fn write_f64(&mut self, idx: usize, val: f64) {
        self.write_bits(idx, val.to_bits());
    }

    /// Reads the register at its native width.
    pub fn read(&self, idx: usize) -> FloatValue {
        match self.width {
            FloatWidth::F32 => FloatValue::Single(self.read_f32(idx)),
            FloatWidth::F64 => FloatValue::Double(self.read_f64(idx)),
        }
    }

    /// Writes a value of either precision by bitcasting to the register width.
    pub fn write(&mut self, idx: usize, val: FloatValue) {
        self.write_bits(idx, val.to_bits());
    }
}
