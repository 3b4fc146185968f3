//! Programs and the simulator that runs them.

/// Relocatable programs: named sections, labels and exported globals.
pub mod program;

/// Single-hart simulator wrapper.
pub mod simulator;

pub use program::Program;
pub use simulator::Simulator;
