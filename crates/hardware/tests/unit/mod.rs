//! # Unit Components
//!
//! Suites organised like the crate: the ISA layer, the hart and its state, and the
//! program/simulator layer.

/// Configuration parsing and validation.
pub mod config;

/// Register files, MMU, CSRs, traps and the execution loop.
pub mod core;


/// Program placement and end-to-end runs.
pub mod sim;
