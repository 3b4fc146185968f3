//! # CSR Tests
//!
//! Privilege gating, counter views, `mstatus` field isolation and the halt register.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rv32hart_core::common::error::{CpuError, CsrError, ExecError};
use rv32hart_core::core::arch::csr::{
    CYCLE, CounterSnapshot, CsrStore, HALT, INSTRET, MHARTID, MSTATUS, MstatusField,
};
use rv32hart_core::core::arch::mode::PrivilegeMode;

use crate::common::builder::encode;
use crate::common::harness::{TEXT_BASE, TestContext};

#[test]
fn user_mode_cannot_touch_machine_csrs() {
    let word = encode("csrrs", &[10, MSTATUS as i32, 0]);
    let mut ctx = TestContext::new().load_words(&[word]).launch();
    let err = ctx.cpu.step().unwrap_err();
    match err {
        CpuError::Fault(report) => {
            assert_eq!(report.pc, TEXT_BASE);
            assert_eq!(report.instruction, "csrrs a0, mstatus, zero");
            assert_eq!(
                report.error,
                ExecError::Csr(CsrError::InsufficientPrivilege {
                    addr: MSTATUS,
                    mode: PrivilegeMode::User,
                })
            );
        }
        other => panic!("expected a fault, got {other:?}"),
    }
    assert!(ctx.cpu.halted);
}

#[test]
fn user_mode_reads_counters() {
    let mut ctx = TestContext::new()
        .load_words(&[
            encode("addi", &[0, 0, 0]),
            encode("addi", &[0, 0, 0]),
            encode("csrrs", &[10, CYCLE as i32, 0]),
            encode("csrrs", &[11, INSTRET as i32, 0]),
        ])
        .launch();
    ctx.step_n(4);
    assert_eq!(ctx.reg("a0"), 3);
    assert_eq!(ctx.reg("a1"), 3);
}

#[test]
fn read_only_csrs_reject_writes() {
    assert_eq!(
        CsrStore::check_access(MHARTID, PrivilegeMode::Machine, true),
        Err(CsrError::ReadOnly { addr: MHARTID })
    );
    assert_eq!(
        CsrStore::check_access(MHARTID, PrivilegeMode::Machine, false),
        Ok(())
    );
}

#[test]
fn hart_id_is_virtual() {
    let csrs = CsrStore::new();
    let counters = CounterSnapshot {
        hart_id: 3,
        ..CounterSnapshot::default()
    };
    assert_eq!(csrs.get(MHARTID, &counters), 3);
}

#[test]
fn callbacks_shape_reads_and_writes() {
    let mut csrs = CsrStore::empty();
    csrs.register_callback(0x7C0, Some(|_, raw| raw | 1), Some(|_, _, new| new << 1));
    let _ = csrs.set(0x7C0, 4);
    assert_eq!(csrs.raw(0x7C0), 8);
    assert_eq!(csrs.get(0x7C0, &CounterSnapshot::default()), 9);
}

#[test]
fn halt_csr_stops_a_machine_hart() {
    let mut ctx = TestContext::privileged()
        .load_words(&[
            encode("addi", &[5, 0, 17]),
            encode("csrrw", &[0, HALT as i32, 5]),
            encode("addi", &[6, 0, 1]),
        ])
        .launch();
    assert_eq!(ctx.run(), 17);
    assert_eq!(ctx.reg("t1"), 0);
    assert_eq!(ctx.cpu.instret, 2);
}

proptest! {
    #[test]
    fn mstatus_fields_are_isolated(initial in any::<u32>(), value in 0..4_u32) {
        let mut csrs = CsrStore::new();
        csrs.set_raw(MSTATUS, initial);
        csrs.set_mstatus_field(MstatusField::Mpp, value);

        let mask = MstatusField::Mpp.mask() << MstatusField::Mpp.lo();
        prop_assert_eq!(csrs.mstatus_field(MstatusField::Mpp), value);
        prop_assert_eq!(csrs.raw(MSTATUS) & !mask, initial & !mask);
    }

    #[test]
    fn single_bit_fields_round_trip(initial in any::<u32>(), on in any::<bool>()) {
        let mut csrs = CsrStore::new();
        csrs.set_raw(MSTATUS, initial);
        csrs.set_mstatus_field(MstatusField::Mie, u32::from(on));

        prop_assert_eq!(csrs.mstatus_field(MstatusField::Mie), u32::from(on));
        prop_assert_eq!(csrs.raw(MSTATUS) & !(1 << 3), initial & !(1 << 3));
    }
}
