//! Unified Register File.
//!
//! This module provides the `RegisterFile` struct, which acts as a unified interface for
//! accessing both General Purpose Registers (GPRs) and Floating-Point Registers (FPRs).
//! It provides:
//! 1. **Indexed Access:** Fast paths used by instruction handlers.
//! 2. **Named Access:** ABI-name lookup with `fp` aliasing and an optional
//!    "unlimited" mode that accepts arbitrary symbolic names.
//! 3. **Observability:** Last-read/last-written tracking and a textual dump.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::Write;

use crate::common::error::RegisterError;
use crate::core::arch::fpr::{FloatValue, FloatWidth, Fpr};
use crate::core::arch::gpr::Gpr;
use crate::isa::abi;

/// Unified register file containing both general-purpose and floating-point registers.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    gpr: Gpr,
    fpr: Fpr,
    unlimited: bool,
    symbolic: HashMap<String, i32>,
    last_read: Cell<Option<usize>>,
    last_written: Option<usize>,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new(FloatWidth::default(), false)
    }
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    ///
    /// # Arguments
    ///
    /// * `flen` - Floating-point register width.
    /// * `unlimited` - Accept unknown names as symbolic registers instead of failing.
    pub fn new(flen: FloatWidth, unlimited: bool) -> Self {
        Self {
            gpr: Gpr::new(),
            fpr: Fpr::new(flen),
            unlimited,
            symbolic: HashMap::new(),
            last_read: Cell::new(None),
            last_written: None,
        }
    }

    /// Reads a general-purpose register by index.
    pub fn read(&self, idx: usize) -> i32 {
        self.last_read.set(Some(idx));
        self.gpr.read(idx)
    }

    /// Reads a general-purpose register as an unsigned word.
    #[allow(clippy::cast_sign_loss)]
    pub fn read_u(&self, idx: usize) -> u32 {
        self.read(idx) as u32
    }

    /// Writes a general-purpose register by index. Writes to `x0` are discarded.
    pub fn write(&mut self, idx: usize, val: i32) {
        let _ = self.store(idx, val);
    }

    /// Writes an unsigned word into a general-purpose register.
    #[allow(clippy::cast_possible_wrap)]
    pub fn write_u(&mut self, idx: usize, val: u32) {
        self.write(idx, val as i32);
    }

    fn store(&mut self, idx: usize, val: i32) -> bool {
        let stored = self.gpr.write(idx, val);
        if stored {
            self.last_written = Some(idx);
        }
        stored
    }

    /// Reads an integer register by name.
    ///
    /// # Errors
    ///
    /// `RegisterError::Unknown` if the name is not a register and unlimited mode is off.
    pub fn get(&self, name: &str) -> Result<i32, RegisterError> {
        if let Some(idx) = abi::gpr_index(name) {
            return Ok(self.read(idx));
        }
        if self.unlimited {
            return Ok(self.symbolic.get(name).copied().unwrap_or(0));
        }
        Err(RegisterError::Unknown {
            name: name.to_string(),
        })
    }

    /// Writes an integer register by name.
    ///
    /// # Returns
    ///
    /// `Ok(false)` if the write was silently discarded (`zero`).
    ///
    /// # Errors
    ///
    /// `RegisterError::Unknown` if the name is not a register and unlimited mode is off.
    pub fn set(&mut self, name: &str, val: i32) -> Result<bool, RegisterError> {
        if let Some(idx) = abi::gpr_index(name) {
            return Ok(self.store(idx, val));
        }
        if self.unlimited {
            let _ = self.symbolic.insert(name.to_string(), val);
            return Ok(true);
        }
        Err(RegisterError::Unknown {
            name: name.to_string(),
        })
    }

    /// Floating-point register width.
    pub const fn flen(&self) -> FloatWidth {
        self.fpr.width()
    }

    /// Reads a floating-point register by name at its native width.
    ///
    /// # Errors
    ///
    /// `RegisterError::Unknown` for names outside the floating-point set.
    pub fn get_f(&self, name: &str) -> Result<FloatValue, RegisterError> {
        let idx = Self::float_index(name)?;
        Ok(self.fpr.read(idx))
    }

    /// Writes a floating-point register by name, bitcasting to the register width.
    ///
    /// # Errors
    ///
    /// `RegisterError::Unknown` for names outside the floating-point set.
    pub fn set_f(&mut self, name: &str, val: FloatValue) -> Result<(), RegisterError> {
        let idx = Self::float_index(name)?;
        self.fpr.write(idx, val);
        Ok(())
    }

    fn float_index(name: &str) -> Result<usize, RegisterError> {
        abi::fpr_index(name).ok_or_else(|| RegisterError::Unknown {
            name: name.to_string(),
        })
    }

    /// Reads a floating-point register as single precision.
    pub fn read_f32(&self, idx: usize) -> f32 {
        self.fpr.read_f32(idx)
    }

    /// Writes a single-precision value.
    pub fn write_f32(&mut self, idx: usize, val: f32) {
        self.fpr.write_f32(idx, val);
    }

    /// Reads a floating-point register as double precision.
    pub fn read_f64(&self, idx: usize) -> f64 {
        self.fpr.read_f64(idx)
    }

    /// Writes a double-precision value.
    pub fn write_f64(&mut self, idx: usize, val: f64) {
        self.fpr.write_f64(idx, val);
    }

    /// Reads a floating-point register's raw bits.
    pub fn read_f_bits(&self, idx: usize) -> u64 {
        self.fpr.read_bits(idx)
    }

    /// Writes raw bits into a floating-point register.
    pub fn write_f_bits(&mut self, idx: usize, bits: u64) {
        self.fpr.write_bits(idx, bits);
    }

    /// Index of the most recently read integer register.
    pub fn last_read(&self) -> Option<usize> {
        self.last_read.get()
    }

    /// Index of the most recently written integer register.
    pub const fn last_written(&self) -> Option<usize> {
        self.last_written
    }

    /// ABI names of the integer registers, in index order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        abi::GPR_NAMES.iter().copied()
    }

    /// Renders the integer registers, four per line.
    ///
    /// The most recently read register is marked `<`, the most recently written `>`.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (idx, name) in Self::names().enumerate() {
            let marker = if self.last_written == Some(idx) {
                '>'
            } else if self.last_read.get() == Some(idx) {
                '<'
            } else {
                ' '
            };
            let _ = write!(out, "{name:>4}={:#010x}{marker} ", self.gpr.read(idx));
            if idx % 4 == 3 {
                let _ = writeln!(out);
            }
        }
        let mut symbolic: Vec<_> = self.symbolic.iter().collect();
        symbolic.sort();
        for (name, val) in symbolic {
            let _ = writeln!(out, "{name}={val:#010x}");
        }
        out
    }
}
