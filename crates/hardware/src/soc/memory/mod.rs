//! Memory sections.
//!
//! This module implements the storage behind the MMU's address space. It provides:
//! 1. **Sections:** Flag-tagged, owner-tagged spans of bytes or decoded instructions.
//! 2. **Flags:** Read-only and executable permissions checked on every access.

/// Section model and decode cache.
pub mod section;

pub use section::{MemoryFlags, MemorySection, SectionData};
