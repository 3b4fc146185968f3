//! Program Model.
//!
//! A program is what loaders hand to the core: an ordered set of named sections plus a
//! label table. This module performs:
//! 1. **Assembly of Parts:** Sections are kept sorted by base and checked for overlap.
//! 2. **Labels:** Local labels, a subset of which is exported as global symbols.
//! 3. **Placement:** Position-independent programs are shifted to their final base exactly
//!    once; placing again at the same base is a no-op.

use std::collections::{BTreeSet, HashMap};

use crate::common::error::ProgramError;
use crate::soc::memory::MemorySection;

/// Label looked up first when searching for an entry point.
pub const ENTRY_LABEL: &str = "_start";

/// Fallback entry label.
pub const MAIN_LABEL: &str = "main";

/// A loadable program.
#[derive(Clone, Debug)]
pub struct Program {
    name: String,
    sections: Vec<MemorySection>,
    labels: HashMap<String, u32>,
    absolute: BTreeSet<String>,
    exports: BTreeSet<String>,
    base: Option<u32>,
}

impl Program {
    /// Creates a position-independent program. Section bases and labels are offsets
    /// until the program is placed.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sections: Vec::new(),
            labels: HashMap::new(),
            absolute: BTreeSet::new(),
            exports: BTreeSet::new(),
            base: None,
        }
    }

    /// Creates a program fixed at `base`. Section bases and labels are absolute.
    pub fn with_base(name: &str, base: u32) -> Self {
        Self {
            base: Some(base),
            ..Self::new(name)
        }
    }

    /// Program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base address once placed (or fixed at construction).
    pub const fn base(&self) -> Option<u32> {
        self.base
    }

    /// Whether section bases and labels are absolute.
    pub const fn is_placed(&self) -> bool {
        self.base.is_some()
    }

    /// Sections, sorted by base.
    pub fn sections(&self) -> &[MemorySection] {
        &self.sections
    }

    /// Label table.
    pub const fn labels(&self) -> &HashMap<String, u32> {
        &self.labels
    }

    /// Names of exported labels.
    pub const fn exports(&self) -> &BTreeSet<String> {
        &self.exports
    }

    /// Adds a section, keeping sections sorted by base.
    ///
    /// # Errors
    ///
    /// `ProgramError::Overlap` if the section intersects one already present.
    pub fn add_section(&mut self, mut section: MemorySection) -> Result<(), ProgramError> {
        if let Some(other) = self.sections.iter().find(|s| s.overlaps(&section)) {
            return Err(ProgramError::Overlap {
                name: section.name().to_string(),
                base: section.base(),
                size: section.size(),
                other: other.name().to_string(),
            });
        }
        section.set_owner(&self.name);
        let idx = self
            .sections
            .partition_point(|s| s.base() <= section.base());
        self.sections.insert(idx, section);
        Ok(())
    }

    /// Defines a label relative to the program base. Placement shifts it.
    pub fn add_label(&mut self, name: &str, addr: u32) {
        let _ = self.absolute.remove(name);
        let _ = self.labels.insert(name.to_string(), addr);
    }

    /// Defines a label at a fixed address that placement leaves alone.
    pub fn add_absolute_label(&mut self, name: &str, addr: u32) {
        let _ = self.absolute.insert(name.to_string());
        let _ = self.labels.insert(name.to_string(), addr);
    }

    /// Whether `name` was defined with [`Program::add_absolute_label`].
    pub fn is_absolute_label(&self, name: &str) -> bool {
        self.absolute.contains(name)
    }

    /// Marks a label as globally visible once loaded.
    pub fn export_label(&mut self, name: &str) {
        let _ = self.exports.insert(name.to_string());
    }

    /// Shifts every section base and relative label by `base`.
    ///
    /// Placing an already placed program at its current base does nothing.
    ///
    /// # Errors
    ///
    /// `ProgramError::Relocation` if the program is already at a different base;
    /// `ProgramError::AddressOverflow` if a section would leave the 32-bit space.
    pub fn place_at(&mut self, base: u32) -> Result<(), ProgramError> {
        if let Some(fixed) = self.base {
            if fixed == base {
                return Ok(());
            }
            return Err(ProgramError::Relocation {
                program: self.name.clone(),
                fixed,
                requested: base,
            });
        }
        for section in &self.sections {
            let shifted_base = u64::from(section.base()) + u64::from(base);
            let shifted_end = section.end() + u64::from(base);
            if shifted_base > u64::from(u32::MAX) || shifted_end > u64::from(u32::MAX) + 1 {
                return Err(ProgramError::AddressOverflow {
                    name: section.name().to_string(),
                });
            }
        }
        for section in &mut self.sections {
            let shifted = section.base() + base;
            section.set_base(shifted);
        }
        for (name, addr) in &mut self.labels {
            if !self.absolute.contains(name) {
                *addr = addr.wrapping_add(base);
            }
        }
        self.base = Some(base);
        Ok(())
    }

    /// Span from the lowest section base to the highest section end.
    pub fn size(&self) -> u32 {
        let Some(first) = self.sections.first() else {
            return 0;
        };
        let end = self.sections.iter().map(MemorySection::end).max().unwrap_or(0);
        (end - u64::from(first.base())) as u32
    }

    /// Entry point: `_start`, else `main`, else the first executable section.
    pub fn entrypoint(&self) -> Option<u32> {
        self.labels
            .get(ENTRY_LABEL)
            .or_else(|| self.labels.get(MAIN_LABEL))
            .copied()
            .or_else(|| {
                self.sections
                    .iter()
                    .find(|s| s.flags().executable)
                    .map(MemorySection::base)
            })
    }

    pub(crate) fn into_parts(self) -> ProgramParts {
        ProgramParts {
            name: self.name,
            sections: self.sections,
            labels: self.labels,
            exports: self.exports,
        }
    }
}

/// A placed program taken apart for insertion into an address space.
#[derive(Debug)]
pub(crate) struct ProgramParts {
    pub(crate) name: String,
    pub(crate) sections: Vec<MemorySection>,
    pub(crate) labels: HashMap<String, u32>,
    pub(crate) exports: BTreeSet<String>,
}
