//! Address-space storage.
//!
//! Holds the memory sections that programs are loaded into and the MMU resolves
//! addresses against.

/// Memory sections and permission flags.
pub mod memory;
