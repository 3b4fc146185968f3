//! Trap Handling Logic.
//!
//! This module implements the trap state machine of a privileged hart. It performs the
//! following:
//! 1. **Raising:** Traps are queued and delivered at the next cycle boundary.
//! 2. **Entry:** Delivery saves `pc`, cause and value into `mepc`/`mcause`/`mtval`,
//!    stacks the interrupt-enable bit and privilege in `mstatus`, and jumps to `mtvec`.
//! 3. **Return:** `mret` undoes the stacking.
//! 4. **Timer:** The armed compare value raises a machine timer interrupt once.

use tracing::{debug, warn};

use super::Cpu;
use crate::common::error::Trap;
use crate::core::arch::csr::{
    MCAUSE, MEPC, MIP, MIP_MTIP, MTVAL, MTVEC, MTVEC_MODE_MASK, MTVEC_MODE_VECTORED,
    MstatusField,
};
use crate::core::arch::mode::PrivilegeMode;
use crate::core::arch::trap::{TrapEvent, TrapQueue};

impl Cpu {
    /// Queues a trap for delivery to machine mode.
    pub fn raise(&mut self, trap: Trap) {
        debug!(?trap, pc = format_args!("{:#010x}", self.pc), "trap raised");
        self.traps.push(TrapEvent::machine(trap));
    }

    /// Traps waiting for delivery.
    pub const fn pending_traps(&self) -> &TrapQueue {
        &self.traps
    }

    /// Delivers the most recent eligible pending trap, if any.
    ///
    /// While `mstatus.MIE` is clear only synchronous exceptions are eligible.
    pub fn deliver_pending_trap(&mut self) -> Option<TrapEvent> {
        let enabled = self.csrs.mstatus_field(MstatusField::Mie) != 0;
        let event = self.traps.pop_deliverable(enabled)?;
        self.enter_trap(&event);
        Some(event)
    }

    fn enter_trap(&mut self, event: &TrapEvent) {
        let trap = &event.trap;
        let mie = self.csrs.mstatus_field(MstatusField::Mie);
        self.csrs.set_mstatus_field(MstatusField::Mpie, mie);
        self.csrs
            .set_mstatus_field(MstatusField::Mpp, self.privilege.to_bits());
        self.csrs.set_mstatus_field(MstatusField::Mie, 0);

        self.csrs.set_raw(MEPC, self.pc);
        self.csrs.set_raw(MCAUSE, trap.mcause());
        self.csrs.set_raw(MTVAL, trap.tval());
        if matches!(trap, Trap::MachineTimerInterrupt) {
            let mip = self.csrs.raw(MIP) & !MIP_MTIP;
            self.csrs.set_raw(MIP, mip);
        }

        self.privilege = event.target;
        self.load_reservation = None;
        self.wfi_waiting = false;

        let mtvec = self.csrs.raw(MTVEC);
        let base = mtvec & !MTVEC_MODE_MASK;
        self.pc = if mtvec & MTVEC_MODE_MASK == MTVEC_MODE_VECTORED {
            base.wrapping_add(4 * trap.code())
        } else {
            base
        };
        debug!(
            ?trap,
            epc = format_args!("{:#010x}", self.csrs.raw(MEPC)),
            handler = format_args!("{:#010x}", self.pc),
            "trap delivered"
        );
    }

    /// `mret`: restores the interrupt-enable bit and privilege stacked at trap entry and
    /// resumes at `mepc`.
    pub fn return_from_trap(&mut self) {
        let mpie = self.csrs.mstatus_field(MstatusField::Mpie);
        let mpp = self.csrs.mstatus_field(MstatusField::Mpp);
        self.csrs.set_mstatus_field(MstatusField::Mie, mpie);
        self.privilege = PrivilegeMode::from_bits(mpp).unwrap_or_else(|| {
            warn!(mpp, "unsupported previous privilege, returning to user mode");
            PrivilegeMode::User
        });
        self.csrs.set_mstatus_field(MstatusField::Mpie, 1);
        self.csrs
            .set_mstatus_field(MstatusField::Mpp, PrivilegeMode::User.to_bits());
        self.pc = self.csrs.raw(MEPC);
        debug!(
            pc = format_args!("{:#010x}", self.pc),
            privilege = %self.privilege,
            "returned from trap"
        );
    }

    /// Raises the machine timer interrupt once the clock passes the armed compare value.
    pub(crate) fn poll_timer(&mut self) {
        if self.timer.poll(self.clock.now()) {
            let mip = self.csrs.raw(MIP) | MIP_MTIP;
            self.csrs.set_raw(MIP, mip);
            self.raise(Trap::MachineTimerInterrupt);
        }
    }
}
