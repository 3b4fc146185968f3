//! Shared helpers for the hart tests.

/// Instruction encoders and structured-instruction parsing.
pub mod builder;

/// Test context owning a hart.
pub mod harness;

/// Mock syscall handler and debugger.
pub mod mocks;
