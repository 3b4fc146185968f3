//! Debugger hook.
//!
//! `ebreak` on a hart with an attached debugger stops the run loop and hands the hart to
//! `Debugger::launch`. The debugger may inspect or modify any state, including setting
//! `halted`; execution resumes at the instruction after the `ebreak` when it returns.

use super::Cpu;

/// Interactive (or scripted) inspection of a stopped hart.
pub trait Debugger {
    /// Called with the hart stopped at a breakpoint.
    ///
    /// `breakpoint` is the address of the `ebreak` that stopped it.
    fn launch(&mut self, cpu: &mut Cpu, breakpoint: u32);
}
