//! Configuration system for the hart emulator.
//!
//! This module defines the configuration structures used to parameterize a hart. It provides:
//! 1. **Defaults:** Baseline constants (stack size, load alignment, clock rate).
//! 2. **Structures:** Hierarchical config for general, register, memory, hart and clock
//!    settings.
//! 3. **Validation:** Rejection of values the emulator cannot honour.
//!
//! Configuration is supplied as JSON via [`Config::from_json`] or built with
//! `Config::default()`.

use serde::Deserialize;
use thiserror::Error;

use crate::core::arch::fpr::FloatWidth;

/// Default configuration constants.
mod defaults {
    use crate::common::constants;

    /// Stack allocated for unprivileged harts (512 KiB).
    pub const STACK_SIZE: u32 = constants::DEFAULT_STACK_SIZE;

    /// Alignment used when a program is loaded without an explicit base (4 KiB).
    pub const LOAD_ALIGNMENT: u32 = constants::DEFAULT_LOAD_ALIGNMENT;

    /// Real-time clock rate (1 MHz).
    pub const TICK_RATE_HZ: u64 = constants::DEFAULT_TICK_RATE_HZ;
}

/// Errors raised while parsing or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON was malformed or a field had the wrong type.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field parsed but holds a value the emulator rejects.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted field path.
        field: &'static str,
        /// Human-readable cause.
        reason: String,
    },
}

/// Root configuration object.
///
/// Every section and field is optional; missing values take their defaults.
///
/// # Examples
///
/// ```
/// use rv32hart_core::config::Config;
///
/// let json = r#"{
///     "general": { "privileged": true, "max_cycles": 10000 },
///     "registers": { "flen": 32 },
///     "hart": { "hart_id": 2 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.privileged);
/// assert_eq!(config.hart.hart_id, 2);
/// assert_eq!(config.registers.flen.bits(), 32);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General execution settings.
    pub general: GeneralConfig,
    /// Register file settings.
    pub registers: RegisterConfig,
    /// Address space settings.
    pub memory: MemoryConfig,
    /// Hart identity.
    pub hart: HartConfig,
    /// Real-time clock settings.
    pub clock: ClockConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` for malformed JSON or an unsupported `flen`;
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid {
                field: "clock.tick_rate_hz",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.memory.load_alignment != 0 && !self.memory.load_alignment.is_power_of_two() {
            return Err(ConfigError::Invalid {
                field: "memory.load_alignment",
                reason: format!("{} is not a power of two", self.memory.load_alignment),
            });
        }
        if self.memory.stack_size % 16 != 0 {
            return Err(ConfigError::Invalid {
                field: "memory.stack_size",
                reason: format!("{} is not a multiple of 16", self.memory.stack_size),
            });
        }
        Ok(())
    }
}

/// General execution settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Run as a machine-mode hart: faults become traps and the MMU allocates lazily.
    /// When false the hart is a user-mode process and faults halt it.
    pub privileged: bool,

    /// Emit a `trace!` event for every retired instruction.
    pub trace_instructions: bool,

    /// Stop `run()` after this many cycles.
    pub max_cycles: Option<u64>,
}

/// Register file settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// Floating-point register width: 32 or 64.
    pub flen: FloatWidth,

    /// Accept unknown register names as symbolic registers.
    pub unlimited_registers: bool,
}

/// Address space settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Stack allocated for unprivileged harts; zero disables the stack.
    pub stack_size: u32,

    /// Alignment of automatically placed programs.
    pub load_alignment: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            stack_size: defaults::STACK_SIZE,
            load_alignment: defaults::LOAD_ALIGNMENT,
        }
    }
}

/// Hart identity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HartConfig {
    /// Value of `mhartid`, also placed in `a0` at launch.
    pub hart_id: u32,
}

/// Real-time clock settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Ticks per second of the `time` CSR.
    pub tick_rate_hz: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: defaults::TICK_RATE_HZ,
        }
    }
}
