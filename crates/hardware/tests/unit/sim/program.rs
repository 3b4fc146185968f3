//! # Program Placement Tests

use pretty_assertions::assert_eq;
use rv32hart_core::common::error::ProgramError;
use rv32hart_core::core::units::mmu::Mmu;
use rv32hart_core::sim::program::Program;
use rv32hart_core::soc::memory::{MemoryFlags, MemorySection};

fn text(name: &str, size_words: usize) -> Program {
    let mut program = Program::new(name);
    program
        .add_section(MemorySection::from_words(
            ".text",
            0,
            MemoryFlags::TEXT,
            &vec![0x13; size_words],
        ))
        .unwrap();
    program
}

#[test]
fn placement_shifts_sections_and_labels() {
    let mut program = text("p", 4);
    program
        .add_section(MemorySection::zeroed(".data", 0x40, 8, MemoryFlags::DATA))
        .unwrap();
    program.add_label("buffer", 0x40);

    program.place_at(0x3000).unwrap();
    assert_eq!(program.base(), Some(0x3000));
    assert_eq!(program.sections()[1].base(), 0x3040);
    assert_eq!(program.labels()["buffer"], 0x3040);
    assert_eq!(program.size(), 0x48);
}

#[test]
fn absolute_labels_survive_placement() {
    let mut program = text("p", 4);
    program.add_label("loop", 0x8);
    program.add_absolute_label("uart", 0x1000_0000);
    assert!(program.is_absolute_label("uart"));

    program.place_at(0x3000).unwrap();
    assert_eq!(program.labels()["loop"], 0x3008);
    assert_eq!(program.labels()["uart"], 0x1000_0000);

    program.add_label("uart", 0x10);
    assert!(!program.is_absolute_label("uart"));
}

#[test]
fn placement_is_idempotent_at_the_same_base() {
    let mut program = text("p", 1);
    program.place_at(0x3000).unwrap();
    program.place_at(0x3000).unwrap();
    assert_eq!(program.sections()[0].base(), 0x3000);

    assert_eq!(
        program.place_at(0x4000),
        Err(ProgramError::Relocation {
            program: "p".to_string(),
            fixed: 0x3000,
            requested: 0x4000,
        })
    );
}

#[test]
fn placement_rejects_wrapping_past_the_address_space() {
    let mut program = text("p", 4);
    assert!(matches!(
        program.place_at(u32::MAX - 4),
        Err(ProgramError::AddressOverflow { .. })
    ));
    assert!(!program.is_placed());
}

#[test]
fn overlapping_sections_are_rejected() {
    let mut program = text("p", 4);
    let err = program
        .add_section(MemorySection::zeroed(".data", 8, 8, MemoryFlags::DATA))
        .unwrap_err();
    assert!(matches!(err, ProgramError::Overlap { ref other, .. } if other == ".text"));
}

#[test]
fn position_independent_programs_stack_upwards() {
    let mut mmu = Mmu::new(false, 0x1000);
    let first = mmu.load_program(text("a", 4), None).unwrap();
    let second = mmu.load_program(text("b", 4), None).unwrap();
    assert_eq!(first, 0x1000);
    assert_eq!(second, 0x2000);
    assert_eq!(mmu.programs().len(), 2);
    assert_eq!(mmu.context_for(0x2004), Some("b"));
}

#[test]
fn fixed_programs_must_not_collide() {
    let mut mmu = Mmu::new(false, 0x1000);
    let _ = mmu.load_program(text("a", 4), Some(0x1000)).unwrap();
    assert!(matches!(
        mmu.load_program(text("b", 4), Some(0x1008)),
        Err(ProgramError::Overlap { .. })
    ));
}

#[test]
fn exported_labels_become_globals() {
    let mut lib = text("lib", 4);
    lib.add_label("helper", 8);
    lib.export_label("helper");
    let mut dup = text("dup", 4);
    dup.add_label("helper", 0);
    dup.export_label("helper");

    let mut mmu = Mmu::new(false, 0x1000);
    let base = mmu.load_program(lib, None).unwrap();
    assert_eq!(mmu.globals()["helper"], base + 8);
    assert_eq!(mmu.resolve_symbol("helper"), Some(base + 8));
    assert_eq!(
        mmu.load_program(dup, None),
        Err(ProgramError::DuplicateGlobal {
            name: "helper".to_string()
        })
    );
}

#[test]
fn entry_point_prefers_start_then_main() {
    let mut program = text("p", 4);
    program.add_label("main", 8);
    assert_eq!(program.entrypoint(), Some(8));
    program.add_label("_start", 4);
    assert_eq!(program.entrypoint(), Some(4));

    let mut mmu = Mmu::new(false, 0x1000);
    let base = mmu.load_program(program, None).unwrap();
    assert_eq!(mmu.find_entrypoint(), Some(base + 4));
}

#[test]
fn addresses_translate_to_labels() {
    let mut program = text("p", 4);
    program.add_label("start", 0);
    program.add_label("tail", 8);
    let mut mmu = Mmu::new(false, 0x1000);
    let base = mmu.load_program(program, None).unwrap();

    assert_eq!(mmu.translate_address(base), "start");
    assert_eq!(mmu.translate_address(base + 4), "start+0x4");
    assert_eq!(mmu.translate_address(base + 12), "tail+0x4");
    assert_eq!(mmu.translate_address(0x10), "0x00000010");
}
