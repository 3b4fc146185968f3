//! Control Transfer and Load Reservations.

use super::Cpu;
use crate::common::error::{ExecError, Trap};

impl Cpu {
    /// Redirects `pc` to `target`.
    ///
    /// # Errors
    ///
    /// `InstructionAddressMisaligned` if `target` is not 4-byte aligned; `pc` is left
    /// unchanged.
    pub fn jump(&mut self, target: u32) -> Result<(), ExecError> {
        if target % 4 != 0 {
            return Err(Trap::InstructionAddressMisaligned(target).into());
        }
        self.pc = target;
        Ok(())
    }

    /// Records a load reservation on `addr` (`lr.w`).
    pub const fn reserve(&mut self, addr: u32) {
        self.load_reservation = Some(addr);
    }

    /// Consumes the reservation; `true` if it was held on `addr` (`sc.w`).
    pub const fn take_reservation(&mut self, addr: u32) -> bool {
        matches!(self.load_reservation.take(), Some(reserved) if reserved == addr)
    }

    /// The address currently reserved, if any.
    pub const fn reservation(&self) -> Option<u32> {
        self.load_reservation
    }
}
