//! RISC-V General-Purpose Register File.
//!
//! This module implements the General-Purpose Register (GPR) file for RV32.
//! It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`) as two's-complement `i32`.
//! 2. **Invariant Enforcement:** Ensures that register `x0` is hardwired to zero.

use crate::common::constants::REGISTER_COUNT;

/// General-Purpose Register file.
///
/// Contains 32 general-purpose registers used for integer operations. Register `x0`
/// is hardwired to zero and cannot be modified. Unsigned views are derived by callers
/// with `as u32`; nothing is stored twice.
#[derive(Clone, Debug)]
pub struct Gpr {
    regs: [i32; REGISTER_COUNT],
}

impl Default for Gpr {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpr {
    /// Creates a new general-purpose register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; REGISTER_COUNT],
        }
    }

    /// Reads a general-purpose register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    ///
    /// # Returns
    ///
    /// The value stored in the register. Register `x0` always returns 0.
    pub fn read(&self, idx: usize) -> i32 {
        if idx == 0 {
            0
        } else {
            self.regs.get(idx).copied().unwrap_or(0)
        }
    }

    /// Writes a value to a general-purpose register.
    ///
    /// # Returns
    ///
    /// `false` if the write was discarded (register `x0` or an out-of-range index).
    pub fn write(&mut self, idx: usize, val: i32) -> bool {
        if idx == 0 {
            return false;
        }
        match self.regs.get_mut(idx) {
            Some(slot) => {
                *slot = val;
                true
            }
            None => false,
        }
    }
}
