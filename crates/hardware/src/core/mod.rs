//! Hart model.
//!
//! The architectural state (`arch`), the hart that owns it and runs the fetch-execute
//! loop (`cpu`), and the units it delegates to (`units`).

/// Architectural state: CSRs, register files, privilege modes, the trap queue and clock.
pub mod arch;

/// The hart and its execution loop.
pub mod cpu;

/// Units the hart delegates to (the MMU).
pub mod units;

pub use self::cpu::Cpu;
