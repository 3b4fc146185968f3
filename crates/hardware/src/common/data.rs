//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the emulator.
//! These types are used for the following:
//! 1. **Permission Validation:** Checking read-only and executable section flags.
//! 2. **Fault Generation:** Choosing between instruction, load, and store access faults.
//! 3. **Diagnostics:** Naming the failed operation in error messages.

use std::fmt;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Instruction fetch access. Requires the executable flag.
    Fetch,

    /// Data read access.
    Read,

    /// Data write access. Rejected by read-only sections.
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}
