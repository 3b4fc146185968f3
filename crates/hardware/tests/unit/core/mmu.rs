//! # MMU Tests
//!
//! Address resolution against sections: bounds, permissions, instruction sections and
//! lazy allocation.

use pretty_assertions::assert_eq;
use rv32hart_core::common::AccessType;
use rv32hart_core::common::error::MemoryError;
use rv32hart_core::core::units::mmu::{MMU_OWNER, Mmu};
use rv32hart_core::soc::memory::{MemoryFlags, MemorySection};

use crate::common::builder::{encode, structured};

fn mmu_with(section: MemorySection) -> Mmu {
    let mut mmu = Mmu::new(false, 0x1000);
    mmu.add_section(section).expect("empty address space");
    mmu
}

#[test]
fn accesses_stay_inside_a_section() {
    let mut mmu = mmu_with(MemorySection::zeroed(".data", 0x100, 16, MemoryFlags::DATA));

    mmu.write_u32(0x10C, 0xDEAD_BEEF).unwrap();
    assert_eq!(mmu.read_u32(0x10C).unwrap(), 0xDEAD_BEEF);
    assert_eq!(mmu.read_u8(0x10F).unwrap(), 0xDE);
    assert_eq!(
        mmu.read_u32(0x10D),
        Err(MemoryError::OutOfBounds {
            addr: 0x10D,
            size: 4,
            access: AccessType::Read,
        })
    );
    assert!(mmu.read_u8(0xFF).is_err());
    assert!(mmu.write_u8(0x110, 1).is_err());
}

#[test]
fn read_only_sections_reject_writes() {
    let mut mmu = mmu_with(MemorySection::from_bytes(
        ".rodata",
        0x200,
        MemoryFlags::RODATA,
        vec![1, 2, 3, 4],
    ));
    assert_eq!(mmu.read_u32(0x200).unwrap(), 0x0403_0201);
    assert!(matches!(
        mmu.write_u16(0x202, 0),
        Err(MemoryError::ReadOnly { addr: 0x202, .. })
    ));
}

#[test]
fn structured_sections_reject_raw_access() {
    let mut mmu = mmu_with(MemorySection::from_instructions(
        ".text",
        0x400,
        MemoryFlags::TEXT_WRITABLE,
        vec![structured("nop")],
    ));
    assert!(mmu.fetch(0x400).is_ok());
    assert!(matches!(
        mmu.read_u32(0x400),
        Err(MemoryError::RawAccessToInstructions { .. })
    ));
}

#[test]
fn data_sections_are_not_executable() {
    let mut mmu = mmu_with(MemorySection::zeroed(".data", 0x100, 16, MemoryFlags::DATA));
    assert!(matches!(
        mmu.fetch(0x100),
        Err(MemoryError::NotExecutable { addr: 0x100, .. })
    ));
}

#[test]
fn fetch_alignment_is_relative_to_the_section_base() {
    let mut mmu = mmu_with(MemorySection::from_instructions(
        ".text",
        0x1002,
        MemoryFlags::TEXT,
        vec![structured("nop"), structured("addi a0, zero, 1")],
    ));
    assert_eq!(
        mmu.fetch(0x1004).map(|inst| inst.mnemonic().to_string()),
        Err(MemoryError::MisalignedFetch { addr: 0x1004 })
    );
    assert_eq!(mmu.fetch(0x1006).unwrap().mnemonic(), "addi");
}

#[test]
fn writes_invalidate_decoded_words() {
    let addi = encode("addi", &[10, 0, 1]);
    let mut mmu = mmu_with(MemorySection::from_words(
        ".text",
        0x400,
        MemoryFlags::TEXT_WRITABLE,
        &[addi],
    ));
    assert_eq!(mmu.fetch(0x400).unwrap().mnemonic(), "addi");
    mmu.write_u32(0x400, 0x0000_0073).unwrap();
    assert_eq!(mmu.fetch(0x400).unwrap().mnemonic(), "ecall");
}

#[test]
fn lazy_allocation_fills_gaps_with_zeroed_sections() {
    let mut mmu = Mmu::new(true, 0x1000);
    mmu.add_section(MemorySection::zeroed(".data", 0x8000, 16, MemoryFlags::DATA))
        .unwrap();

    assert_eq!(mmu.read_u32(0x5000).unwrap(), 0);
    mmu.write_u32(0x5004, 9).unwrap();
    assert_eq!(mmu.read_u32(0x5004).unwrap(), 9);

    let lazy = mmu.section_for(0x5000).expect("synthesised");
    assert_eq!(lazy.owner(), MMU_OWNER);
    assert!(u64::from(lazy.base()) <= 0x5000 && lazy.end() <= 0x8000);
    assert_eq!(mmu.section_for(0x8000).unwrap().name(), ".data");
}

#[test]
fn strict_address_spaces_do_not_allocate() {
    let mut mmu = Mmu::new(false, 0x1000);
    assert!(mmu.read_u32(0x5000).is_err());
    assert!(mmu.sections().is_empty());
}
