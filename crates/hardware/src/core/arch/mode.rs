//! RISC-V Privilege Modes.
//!
//! This module defines the privilege levels supported by the hart. It implements the following:
//! 1. **Mode Classification:** User (U) and Machine (M) modes. There is no Supervisor mode.
//! 2. **Serialization:** Conversion between the 2-bit `mstatus.MPP` encoding and enum variants.
//! 3. **Observability:** Human-readable naming and display formatting for privilege states.

/// RISC-V privilege mode levels.
///
/// Machine mode is the highest privilege level. Ordering follows the numeric encoding,
/// so `mode >= required` expresses CSR privilege gating directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivilegeMode {
    /// User mode (U-mode).
    User = 0,

    /// Machine mode (M-mode).
    #[default]
    Machine = 3,
}

impl PrivilegeMode {
    /// Converts a 2-bit privilege encoding to a mode.
    ///
    /// # Returns
    ///
    /// `Some(mode)` for 0 and 3; `None` for the unsupported encodings 1 and 2.
    pub const fn from_bits(val: u32) -> Option<Self> {
        match val & 0b11 {
            0 => Some(Self::User),
            3 => Some(Self::Machine),
            _ => None,
        }
    }

    /// Converts a privilege mode to its 2-bit encoding.
    pub const fn to_bits(self) -> u32 {
        self as u32
    }

    /// Returns the human-readable name of the privilege mode.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Machine => "Machine",
        }
    }
}

impl std::fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
