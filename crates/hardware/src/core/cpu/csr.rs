//! CSR Access.
//!
//! Instructions reach the CSR store through `csr_read` / `csr_write`, which gate every
//! access on the current privilege level and apply the side effects a write requests.

use tracing::debug;

use super::Cpu;
use crate::common::error::ExecError;
use crate::core::arch::csr::{
    CounterSnapshot, CsrEffect, CsrStore, FCSR, FCSR_FFLAGS_MASK, FCSR_FRM_MASK, FCSR_FRM_SHIFT,
    MIP, MIP_MTIP,
};

impl Cpu {
    /// Current counter values as seen by counter CSRs.
    pub fn counters(&self) -> CounterSnapshot {
        CounterSnapshot {
            cycle: self.cycle,
            instret: self.instret,
            time: self.clock.now(),
            hart_id: self.hart_id,
        }
    }

    /// Reads a CSR on behalf of an instruction.
    ///
    /// # Errors
    ///
    /// A CSR error when the current privilege may not read `addr`.
    pub fn csr_read(&self, addr: u32) -> Result<u32, ExecError> {
        CsrStore::check_access(addr, self.privilege, false)?;
        Ok(self.csrs.get(addr, &self.counters()))
    }

    /// Writes a CSR on behalf of an instruction and applies its side effect.
    ///
    /// # Errors
    ///
    /// A CSR error when the current privilege may not write `addr`.
    pub fn csr_write(&mut self, addr: u32, value: u32) -> Result<(), ExecError> {
        CsrStore::check_access(addr, self.privilege, true)?;
        match self.csrs.set(addr, value) {
            CsrEffect::None => {}
            CsrEffect::Halt(code) => self.halt(code),
            CsrEffect::ArmTimer(compare) => {
                let mip = self.csrs.raw(MIP) & !MIP_MTIP;
                self.csrs.set_raw(MIP, mip);
                self.timer.arm(compare);
                debug!(compare, "timer armed");
            }
        }
        Ok(())
    }

    /// ORs exception flags into `fcsr`.
    pub fn accrue_fflags(&mut self, flags: u32) {
        if flags != 0 {
            let fcsr = self.csrs.raw(FCSR) | (flags & FCSR_FFLAGS_MASK);
            self.csrs.set_raw(FCSR, fcsr);
        }
    }

    /// The dynamic rounding mode held in `fcsr`.
    pub fn dynamic_rounding_mode(&self) -> u32 {
        (self.csrs.raw(FCSR) >> FCSR_FRM_SHIFT) & FCSR_FRM_MASK
    }
}
