//! Memory Management Unit (MMU).
//!
//! This module implements the hart's address space. It is responsible for:
//! 1. **Resolution:** Finding the section that owns an address in a list sorted by base.
//! 2. **Dispatch:** Routing reads, writes and fetches to that section's checked accessors.
//! 3. **Lazy Allocation:** In privileged mode, synthesizing zero-filled data sections on
//!    a miss so machine-mode code sees an open address space without paging.
//! 4. **Symbols:** Per-program label tables plus the global symbol dictionary, written
//!    only while programs are placed.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use tracing::debug;

use crate::common::constants::{
    ADDRESS_SPACE_END, DEFAULT_LOAD_ALIGNMENT, LAZY_SECTION_ALIGN, LAZY_SECTION_NAME,
    LAZY_SECTION_WINDOW,
};
use crate::common::data::AccessType;
use crate::common::error::{MemoryError, ProgramError};
use crate::isa::instruction::{Instruction, SymbolResolver};
use crate::sim::program::{ENTRY_LABEL, MAIN_LABEL, Program};
use crate::soc::memory::{MemoryFlags, MemorySection};

/// Owner recorded on sections the MMU creates itself.
pub const MMU_OWNER: &str = "<mmu>";

/// A program after placement into the address space.
#[derive(Clone, Debug)]
pub struct LoadedProgram {
    /// Program name.
    pub name: String,
    /// Base it was placed at.
    pub base: u32,
    /// Absolute label addresses.
    pub labels: HashMap<String, u32>,
}

const fn align_down(value: u64, align: u64) -> u64 {
    value & !(align - 1)
}

const fn align_up(value: u64, align: u64) -> u64 {
    (value + align - 1) & !(align - 1)
}

/// The hart's address space.
#[derive(Clone, Debug)]
pub struct Mmu {
    sections: Vec<MemorySection>,
    programs: Vec<LoadedProgram>,
    globals: HashMap<String, u32>,
    lazy_allocation: bool,
    load_alignment: u32,
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new(false, DEFAULT_LOAD_ALIGNMENT)
    }
}

impl Mmu {
    /// Creates an empty address space.
    ///
    /// # Arguments
    ///
    /// * `lazy_allocation` - Synthesize sections on misses (privileged variant).
    /// * `load_alignment` - Alignment for automatic program placement. Zero means 1.
    pub fn new(lazy_allocation: bool, load_alignment: u32) -> Self {
        Self {
            sections: Vec::new(),
            programs: Vec::new(),
            globals: HashMap::new(),
            lazy_allocation,
            load_alignment: load_alignment.max(1).next_power_of_two(),
        }
    }

    /// Whether misses synthesize sections.
    pub const fn lazy_allocation(&self) -> bool {
        self.lazy_allocation
    }

    /// All sections, sorted by base.
    pub fn sections(&self) -> &[MemorySection] {
        &self.sections
    }

    /// Programs in load order.
    pub fn programs(&self) -> &[LoadedProgram] {
        &self.programs
    }

    /// Global symbol dictionary.
    pub const fn globals(&self) -> &HashMap<String, u32> {
        &self.globals
    }

    fn find_index(&self, addr: u32) -> Option<usize> {
        let idx = self.sections.partition_point(|s| s.base() <= addr);
        let candidate = idx.checked_sub(1)?;
        self.sections[candidate].contains(addr).then_some(candidate)
    }

    /// Section containing `addr`.
    pub fn section_for(&self, addr: u32) -> Option<&MemorySection> {
        self.find_index(addr).map(|idx| &self.sections[idx])
    }

    /// Section by name.
    pub fn section_named(&self, name: &str) -> Option<&MemorySection> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// Name of the program owning the section that contains `addr`.
    pub fn context_for(&self, addr: u32) -> Option<&str> {
        self.section_for(addr).map(MemorySection::owner)
    }

    /// Resolves `addr` to a section index, synthesizing one if allowed.
    fn resolve(&mut self, addr: u32, size: u32, access: AccessType) -> Result<usize, MemoryError> {
        if let Some(idx) = self.find_index(addr) {
            return Ok(idx);
        }
        if self.lazy_allocation {
            return self.allocate_lazy(addr, size, access);
        }
        Err(MemoryError::OutOfBounds { addr, size, access })
    }

    fn allocate_lazy(
        &mut self,
        addr: u32,
        size: u32,
        access: AccessType,
    ) -> Result<usize, MemoryError> {
        let addr_wide = u64::from(addr);
        if addr_wide >= ADDRESS_SPACE_END {
            return Err(MemoryError::OutOfBounds { addr, size, access });
        }
        let idx = self.sections.partition_point(|s| s.base() <= addr);
        let prev_end = idx
            .checked_sub(1)
            .map_or(0, |prev| self.sections[prev].end());
        let next_base = self
            .sections
            .get(idx)
            .map_or(ADDRESS_SPACE_END, |next| u64::from(next.base()));

        let lo = prev_end.max(align_down(
            addr_wide.saturating_sub(LAZY_SECTION_WINDOW),
            LAZY_SECTION_ALIGN,
        ));
        let hi = next_base.min(align_up(addr_wide + LAZY_SECTION_WINDOW, LAZY_SECTION_ALIGN));
        let section = MemorySection::zeroed(
            LAZY_SECTION_NAME,
            lo as u32,
            (hi - lo) as u32,
            MemoryFlags::DATA,
        );
        debug!(
            base = format_args!("{lo:#010x}"),
            end = format_args!("{hi:#010x}"),
            fault = format_args!("{addr:#010x}"),
            "allocated lazy section"
        );
        let mut section = section;
        section.set_owner(MMU_OWNER);
        self.sections.insert(idx, section);
        Ok(idx)
    }

    /// Reads `size` bytes at `addr`.
    pub fn read(&mut self, addr: u32, size: u32) -> Result<Vec<u8>, MemoryError> {
        let idx = self.resolve(addr, size, AccessType::Read)?;
        self.sections[idx].read(addr, size).map(<[u8]>::to_vec)
    }

    /// Writes `data` at `addr`.
    pub fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), MemoryError> {
        let idx = self.resolve(addr, data.len() as u32, AccessType::Write)?;
        self.sections[idx].write(addr, data)
    }

    /// Fetches the instruction at `addr`.
    pub fn fetch(&mut self, addr: u32) -> Result<Arc<Instruction>, MemoryError> {
        let idx = self.resolve(addr, 4, AccessType::Fetch)?;
        self.sections[idx].fetch(addr)
    }

    /// Reads a byte.
    pub fn read_u8(&mut self, addr: u32) -> Result<u8, MemoryError> {
        Ok(self.read(addr, 1)?[0])
    }

    /// Reads a little-endian halfword.
    pub fn read_u16(&mut self, addr: u32) -> Result<u16, MemoryError> {
        let bytes = self.read(addr, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a little-endian word.
    pub fn read_u32(&mut self, addr: u32) -> Result<u32, MemoryError> {
        let bytes = self.read(addr, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a little-endian doubleword.
    pub fn read_u64(&mut self, addr: u32) -> Result<u64, MemoryError> {
        let bytes = self.read(addr, 8)?;
        let mut raw = [0; 8];
        raw.copy_from_slice(&bytes);
        Ok(u64::from_le_bytes(raw))
    }

    /// Writes a byte.
    pub fn write_u8(&mut self, addr: u32, val: u8) -> Result<(), MemoryError> {
        self.write(addr, &[val])
    }

    /// Writes a little-endian halfword.
    pub fn write_u16(&mut self, addr: u32, val: u16) -> Result<(), MemoryError> {
        self.write(addr, &val.to_le_bytes())
    }

    /// Writes a little-endian word.
    pub fn write_u32(&mut self, addr: u32, val: u32) -> Result<(), MemoryError> {
        self.write(addr, &val.to_le_bytes())
    }

    /// Writes a little-endian doubleword.
    pub fn write_u64(&mut self, addr: u32, val: u64) -> Result<(), MemoryError> {
        self.write(addr, &val.to_le_bytes())
    }

    /// Inserts a section directly.
    ///
    /// # Errors
    ///
    /// `ProgramError::Overlap` if it intersects an existing section.
    pub fn add_section(&mut self, section: MemorySection) -> Result<(), ProgramError> {
        self.check_overlap(&section)?;
        let idx = self
            .sections
            .partition_point(|s| s.base() <= section.base());
        self.sections.insert(idx, section);
        Ok(())
    }

    fn check_overlap(&self, section: &MemorySection) -> Result<(), ProgramError> {
        match self.sections.iter().find(|s| s.overlaps(section)) {
            Some(other) => Err(ProgramError::Overlap {
                name: section.name().to_string(),
                base: section.base(),
                size: section.size(),
                other: other.name().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// First base after every existing section, aligned to the load alignment.
    fn next_load_base(&self) -> u64 {
        let align = u64::from(self.load_alignment);
        let top = self
            .sections
            .iter()
            .filter(|s| s.owner() != MMU_OWNER)
            .map(MemorySection::end)
            .max()
            .unwrap_or(align);
        align_up(top.max(align), align)
    }

    /// Places a program into the address space.
    ///
    /// Without an explicit base, programs that are already placed keep their base and
    /// position-independent ones go after the highest loaded section.
    ///
    /// # Returns
    ///
    /// The base address the program was placed at.
    ///
    /// # Errors
    ///
    /// Relocation, overlap, overflow and duplicate-global violations.
    pub fn load_program(
        &mut self,
        mut program: Program,
        base: Option<u32>,
    ) -> Result<u32, ProgramError> {
        let base = match (base, program.base()) {
            (Some(base), _) | (None, Some(base)) => base,
            (None, None) => {
                let next = self.next_load_base();
                u32::try_from(next).map_err(|_| ProgramError::AddressOverflow {
                    name: program.name().to_string(),
                })?
            }
        };
        program.place_at(base)?;

        for section in program.sections() {
            self.check_overlap(section)?;
        }
        for name in program.exports() {
            if self.globals.contains_key(name) {
                return Err(ProgramError::DuplicateGlobal { name: name.clone() });
            }
        }

        let parts = program.into_parts();
        for name in &parts.exports {
            if let Some(addr) = parts.labels.get(name) {
                let _ = self.globals.insert(name.clone(), *addr);
            }
        }
        for section in parts.sections {
            debug!(
                program = %parts.name,
                section = section.name(),
                base = format_args!("{:#010x}", section.base()),
                size = section.size(),
                "placed section"
            );
            let idx = self
                .sections
                .partition_point(|s| s.base() <= section.base());
            self.sections.insert(idx, section);
        }
        self.programs.push(LoadedProgram {
            name: parts.name,
            base,
            labels: parts.labels,
        });
        Ok(base)
    }

    /// Allocates a zeroed section of `size` bytes in the first free gap at or above the
    /// load alignment.
    ///
    /// # Returns
    ///
    /// The base address of the new section.
    pub fn allocate_section(
        &mut self,
        name: &str,
        size: u32,
        flags: MemoryFlags,
    ) -> Result<u32, MemoryError> {
        let size_wide = u64::from(size);
        let mut cursor = u64::from(self.load_alignment);
        for section in &self.sections {
            if u64::from(section.base()) >= cursor + size_wide {
                break;
            }
            cursor = cursor.max(align_up(section.end(), LAZY_SECTION_ALIGN));
        }
        if cursor + size_wide > ADDRESS_SPACE_END {
            return Err(MemoryError::OutOfMemory {
                name: name.to_string(),
                size,
            });
        }
        let mut section = MemorySection::zeroed(name, cursor as u32, size, flags);
        section.set_owner(MMU_OWNER);
        let idx = self.sections.partition_point(|s| u64::from(s.base()) <= cursor);
        self.sections.insert(idx, section);
        debug!(
            section = name,
            base = format_args!("{cursor:#010x}"),
            size,
            "allocated section"
        );
        Ok(cursor as u32)
    }

    /// Looks a symbol up in each program's labels, then in the global dictionary.
    pub fn resolve_symbol(&self, name: &str) -> Option<u32> {
        self.programs
            .iter()
            .find_map(|p| p.labels.get(name).copied())
            .or_else(|| self.globals.get(name).copied())
    }

    /// Entry point across all loaded programs.
    ///
    /// A global `_start` wins, then any program's `_start` or `main`, then the first
    /// executable section.
    pub fn find_entrypoint(&self) -> Option<u32> {
        self.globals
            .get(ENTRY_LABEL)
            .copied()
            .or_else(|| {
                self.programs.iter().find_map(|p| {
                    p.labels
                        .get(ENTRY_LABEL)
                        .or_else(|| p.labels.get(MAIN_LABEL))
                        .copied()
                })
            })
            .or_else(|| {
                self.sections
                    .iter()
                    .find(|s| s.flags().executable)
                    .map(MemorySection::base)
            })
    }

    /// Renders `addr` as `label+offset` using the nearest preceding label in the same
    /// section, or as plain hex.
    pub fn translate_address(&self, addr: u32) -> String {
        let floor = self.section_for(addr).map_or(0, MemorySection::base);
        let best = self
            .programs
            .iter()
            .flat_map(|p| p.labels.iter())
            .chain(self.globals.iter())
            .filter(|(_, value)| **value <= addr && **value >= floor)
            .max_by(|(an, av), (bn, bv)| av.cmp(bv).then_with(|| bn.cmp(an)));
        match best {
            Some((name, value)) if *value == addr => name.clone(),
            Some((name, value)) => format!("{name}+{:#x}", addr - value),
            None => format!("{addr:#010x}"),
        }
    }

    /// Renders the section table.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<10} {:<10} {:<4} {:<16} owner", "base", "end", "flg", "name");
        for section in &self.sections {
            let _ = writeln!(
                out,
                "{:#010x} {:#010x} {:<4} {:<16} {}",
                section.base(),
                section.end(),
                section.flags().to_string(),
                section.name(),
                section.owner()
            );
        }
        out
    }
}

impl SymbolResolver for Mmu {
    fn resolve_symbol(&self, name: &str) -> Option<u32> {
        Self::resolve_symbol(self, name)
    }
}
