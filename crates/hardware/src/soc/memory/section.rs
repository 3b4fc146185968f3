//! Memory Sections.
//!
//! A section is a contiguous, permission-tagged span of the address space owned by one
//! program. It provides:
//! 1. **Storage:** Either a byte buffer or a sequence of pre-decoded instructions.
//! 2. **Checks:** Bounds, read-only and executable enforcement for every access.
//! 3. **Decode Cache:** Raw words decoded on fetch are cached per word and dropped when
//!    a write overlaps them.

use std::sync::Arc;

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::data::AccessType;
use crate::common::error::MemoryError;
use crate::isa::decode::decode;
use crate::isa::instruction::Instruction;

/// Permission flags of a section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryFlags {
    /// Writes are rejected.
    pub read_only: bool,
    /// Instruction fetches are permitted.
    pub executable: bool,
}

impl MemoryFlags {
    /// Read/write data.
    pub const DATA: Self = Self {
        read_only: false,
        executable: false,
    };

    /// Read-only data.
    pub const RODATA: Self = Self {
        read_only: true,
        executable: false,
    };

    /// Read-only executable code.
    pub const TEXT: Self = Self {
        read_only: true,
        executable: true,
    };

    /// Writable executable code.
    pub const TEXT_WRITABLE: Self = Self {
        read_only: false,
        executable: true,
    };
}

impl std::fmt::Display for MemoryFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let w = if self.read_only { '-' } else { 'w' };
        let x = if self.executable { 'x' } else { '-' };
        write!(f, "r{w}{x}")
    }
}

/// Section contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionData {
    /// Raw little-endian bytes, decoded on fetch.
    Bytes(Vec<u8>),
    /// Pre-decoded instructions, one per 4-byte slot.
    Instructions(Vec<Arc<Instruction>>),
}

/// A contiguous span of the address space.
#[derive(Clone, Debug)]
pub struct MemorySection {
    name: String,
    owner: String,
    base: u32,
    flags: MemoryFlags,
    data: SectionData,
    decode_cache: Vec<Option<Arc<Instruction>>>,
}

impl MemorySection {
    /// Creates a byte-backed section.
    pub fn from_bytes(name: &str, base: u32, flags: MemoryFlags, bytes: Vec<u8>) -> Self {
        let words = bytes.len().div_ceil(INSTRUCTION_SIZE as usize);
        Self {
            name: name.to_string(),
            owner: String::new(),
            base,
            flags,
            data: SectionData::Bytes(bytes),
            decode_cache: vec![None; words],
        }
    }

    /// Creates a zero-filled byte-backed section.
    pub fn zeroed(name: &str, base: u32, size: u32, flags: MemoryFlags) -> Self {
        Self::from_bytes(name, base, flags, vec![0; size as usize])
    }

    /// Creates a section from little-endian instruction words.
    pub fn from_words(name: &str, base: u32, flags: MemoryFlags, words: &[u32]) -> Self {
        let bytes = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        Self::from_bytes(name, base, flags, bytes)
    }

    /// Creates a section of pre-decoded instructions.
    pub fn from_instructions(
        name: &str,
        base: u32,
        flags: MemoryFlags,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            name: name.to_string(),
            owner: String::new(),
            base,
            flags,
            data: SectionData::Instructions(instructions.into_iter().map(Arc::new).collect()),
            decode_cache: Vec::new(),
        }
    }

    /// Section name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning program.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: &str) {
        owner.clone_into(&mut self.owner);
    }

    /// Base address.
    pub const fn base(&self) -> u32 {
        self.base
    }

    pub(crate) fn set_base(&mut self, base: u32) {
        self.base = base;
    }

    /// Length in bytes.
    pub fn size(&self) -> u32 {
        match &self.data {
            SectionData::Bytes(bytes) => bytes.len() as u32,
            SectionData::Instructions(instructions) => {
                instructions.len() as u32 * INSTRUCTION_SIZE
            }
        }
    }

    /// Exclusive end address, widened so sections touching the top of memory are representable.
    pub fn end(&self) -> u64 {
        u64::from(self.base) + u64::from(self.size())
    }

    /// Permission flags.
    pub const fn flags(&self) -> MemoryFlags {
        self.flags
    }

    /// Whether `addr` falls inside the half-open range `[base, end)`.
    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.base && u64::from(addr) < self.end()
    }

    /// Whether `[base, end)` intersects another section's range.
    pub fn overlaps(&self, other: &Self) -> bool {
        u64::from(self.base) < other.end() && u64::from(other.base) < self.end()
    }

    /// Raw contents, if the section is byte-backed.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.data {
            SectionData::Bytes(bytes) => Some(bytes),
            SectionData::Instructions(_) => None,
        }
    }

    /// Whether the section holds pre-decoded instructions.
    pub const fn holds_instructions(&self) -> bool {
        matches!(self.data, SectionData::Instructions(_))
    }

    fn range(&self, addr: u32, size: u32, access: AccessType) -> Result<usize, MemoryError> {
        let out_of_bounds = MemoryError::OutOfBounds { addr, size, access };
        if addr < self.base {
            return Err(out_of_bounds);
        }
        let offset = addr - self.base;
        if u64::from(offset) + u64::from(size) > u64::from(self.size()) {
            return Err(out_of_bounds);
        }
        Ok(offset as usize)
    }

    /// Reads `size` bytes starting at absolute address `addr`.
    pub fn read(&self, addr: u32, size: u32) -> Result<&[u8], MemoryError> {
        let offset = self.range(addr, size, AccessType::Read)?;
        match &self.data {
            SectionData::Bytes(bytes) => Ok(&bytes[offset..offset + size as usize]),
            SectionData::Instructions(_) => Err(MemoryError::RawAccessToInstructions {
                addr,
                access: AccessType::Read,
                section: self.name.clone(),
            }),
        }
    }

    /// Writes `data` starting at absolute address `addr`.
    pub fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), MemoryError> {
        let size = data.len() as u32;
        if self.flags.read_only {
            return Err(MemoryError::ReadOnly {
                addr,
                size,
                section: self.name.clone(),
            });
        }
        let offset = self.range(addr, size, AccessType::Write)?;
        match &mut self.data {
            SectionData::Bytes(bytes) => {
                bytes[offset..offset + data.len()].copy_from_slice(data);
            }
            SectionData::Instructions(_) => {
                return Err(MemoryError::RawAccessToInstructions {
                    addr,
                    access: AccessType::Write,
                    section: self.name.clone(),
                });
            }
        }
        self.invalidate(offset, data.len());
        Ok(())
    }

    fn invalidate(&mut self, offset: usize, len: usize) {
        if len == 0 {
            return;
        }
        let word = INSTRUCTION_SIZE as usize;
        let first = offset / word;
        let last = (offset + len - 1) / word;
        for slot in self.decode_cache.iter_mut().take(last + 1).skip(first) {
            *slot = None;
        }
    }

    /// Fetches the instruction at absolute address `addr`.
    ///
    /// Alignment is checked against the section base, not address zero. Byte-backed sections decode the word on first fetch and cache the result.
    pub fn fetch(&mut self, addr: u32) -> Result<Arc<Instruction>, MemoryError> {
        if !self.flags.executable {
            return Err(MemoryError::NotExecutable {
                addr,
                section: self.name.clone(),
            });
        }
        if addr.wrapping_sub(self.base) % INSTRUCTION_SIZE != 0 {
            return Err(MemoryError::MisalignedFetch { addr });
        }
        let offset = self.range(addr, INSTRUCTION_SIZE, AccessType::Fetch)?;
        let idx = offset / INSTRUCTION_SIZE as usize;
        match &self.data {
            SectionData::Instructions(instructions) => {
                instructions
                    .get(idx)
                    .cloned()
                    .ok_or(MemoryError::OutOfBounds {
                        addr,
                        size: INSTRUCTION_SIZE,
                        access: AccessType::Fetch,
                    })
            }
            SectionData::Bytes(bytes) => {
                if let Some(Some(cached)) = self.decode_cache.get(idx) {
                    return Ok(Arc::clone(cached));
                }
                let mut word = [0; 4];
                word.copy_from_slice(&bytes[offset..offset + INSTRUCTION_SIZE as usize]);
                let decoded = Arc::new(Instruction::Raw(decode(u32::from_le_bytes(word))?));
                if let Some(slot) = self.decode_cache.get_mut(idx) {
                    *slot = Some(Arc::clone(&decoded));
                }
                Ok(decoded)
            }
        }
    }

    /// Number of cached decode results, for diagnostics.
    pub fn cached_decodes(&self) -> usize {
        self.decode_cache.iter().filter(|slot| slot.is_some()).count()
    }
}
