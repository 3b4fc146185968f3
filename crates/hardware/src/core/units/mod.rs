//! Execution units.
//!
//! Holds the memory management unit that owns the hart's address space.

/// Memory Management Unit: section registry, address resolution and symbols.
pub mod mmu;
