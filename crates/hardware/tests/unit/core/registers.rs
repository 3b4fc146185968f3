//! # Register File Tests
//!
//! Tests for the unified register file: the hardwired zero register, ABI aliases and
//! floating-point width handling.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rv32hart_core::common::RegisterFile;
use rv32hart_core::common::error::RegisterError;
use rv32hart_core::core::arch::fpr::{FloatValue, FloatWidth};

#[test]
fn frame_pointer_aliases_s0() {
    let mut regs = RegisterFile::new(FloatWidth::F64, false);
    let _ = regs.set("fp", 0x1234).unwrap();
    assert_eq!(regs.get("s0").unwrap(), 0x1234);
    assert_eq!(regs.read(8), 0x1234);
}

#[test]
fn numeric_and_abi_names_agree() {
    let mut regs = RegisterFile::new(FloatWidth::F64, false);
    let _ = regs.set("x10", -5).unwrap();
    assert_eq!(regs.get("a0").unwrap(), -5);
}

#[test]
fn unknown_names_are_rejected_unless_unlimited() {
    let mut strict = RegisterFile::new(FloatWidth::F64, false);
    assert_eq!(
        strict.set("tmp", 1),
        Err(RegisterError::Unknown {
            name: "tmp".to_string()
        })
    );

    let mut unlimited = RegisterFile::new(FloatWidth::F64, true);
    assert_eq!(unlimited.set("tmp", 7), Ok(true));
    assert_eq!(unlimited.get("tmp"), Ok(7));
}

#[test]
fn narrow_registers_truncate_doubles() {
    let mut regs = RegisterFile::new(FloatWidth::F32, false);
    regs.set_f("fa0", FloatValue::Double(1.5)).unwrap();
    assert_eq!(regs.read_f_bits(10) >> 32, 0);
    assert!(matches!(regs.get_f("fa0").unwrap(), FloatValue::Single(_)));
}

proptest! {
    #[test]
    fn zero_register_discards_writes(value in any::<i32>()) {
        let mut regs = RegisterFile::new(FloatWidth::F64, false);
        regs.write(0, value);
        prop_assert_eq!(regs.read(0), 0);
        prop_assert_eq!(regs.set("zero", value), Ok(false));
        prop_assert_eq!(regs.get("zero"), Ok(0));
    }

    #[test]
    fn other_registers_hold_values(idx in 1..32_usize, value in any::<i32>()) {
        let mut regs = RegisterFile::new(FloatWidth::F64, false);
        regs.write(idx, value);
        prop_assert_eq!(regs.read(idx), value);
    }
}
