//! Fetch-Execute Loop.
//!
//! One call to `step` is one cycle. It performs the following:
//! 1. **Interrupts:** Polls the timer and delivers a pending trap, if any is eligible.
//! 2. **Stall:** A hart waiting in `wfi` only counts the cycle until an interrupt arrives.
//! 3. **Fetch:** Reads the instruction at `pc` and advances `pc` by 4.
//! 4. **Execute:** Looks up the mnemonic's handler and runs it.
//! 5. **Failure:** Routes handler errors to a trap (privileged) or a fault report that
//!    halts the hart (unprivileged).

use tracing::{error, trace};

use super::Cpu;
use crate::common::error::{CpuError, ExecError, FaultReport};
use crate::isa::instruction::Instruction;

/// Placeholder shown in a fault report when the fetch itself failed.
const UNFETCHED: &str = "<fetch failed>";

impl Cpu {
    /// Executes one cycle.
    ///
    /// # Errors
    ///
    /// * `CpuError::Fault` when an unprivileged hart halts on a failure.
    /// * `CpuError::Unimplemented` / `CpuError::UnknownMnemonic` for instructions with
    ///   no behaviour.
    /// * `CpuError::LaunchDebugger` when `ebreak` hits with a debugger attached.
    /// * `CpuError::CycleLimit` once the configured budget is spent.
    pub fn step(&mut self) -> Result<(), CpuError> {
        if self.halted {
            return Ok(());
        }
        if let Some(limit) = self.max_cycles
            && self.cycle >= limit
        {
            return Err(CpuError::CycleLimit {
                limit,
                pc: self.pc,
            });
        }

        if self.privileged {
            self.poll_timer();
            if let Some(event) = self.deliver_pending_trap() {
                trace!(trap = ?event.trap, cycle = self.cycle, "cycle starts in handler");
            }
        }

        if self.wfi_waiting {
            if !self.traps.has_interrupt() {
                self.cycle += 1;
                return Ok(());
            }
            self.wfi_waiting = false;
        }

        self.cycle += 1;
        self.inst_pc = self.pc;
        let inst = match self.mmu.fetch(self.pc) {
            Ok(inst) => inst,
            Err(e) => return self.fail(None, e.into()),
        };
        self.pc = self.pc.wrapping_add(4);

        let Some(handler) = self.dispatch.get(inst.mnemonic()) else {
            let mnemonic = inst.mnemonic().to_string();
            error!(
                pc = format_args!("{:#010x}", self.inst_pc),
                %mnemonic,
                "no handler registered"
            );
            self.halt(1);
            return Err(CpuError::UnknownMnemonic {
                mnemonic,
                pc: self.inst_pc,
            });
        };

        if self.trace {
            trace!(
                pc = format_args!("{:#010x}", self.inst_pc),
                privilege = %self.privilege,
                "{inst}"
            );
        }

        match handler(self, &inst) {
            Ok(()) => {
                self.instret += 1;
                Ok(())
            }
            Err(e) => self.fail(Some(&*inst), e),
        }
    }

    /// Runs until the hart halts and returns its exit code.
    ///
    /// Debugger requests are served in place and execution continues afterwards.
    ///
    /// # Errors
    ///
    /// Any error from `step` other than a debugger request.
    pub fn run(&mut self) -> Result<u32, CpuError> {
        while !self.halted {
            match self.step() {
                Ok(()) => {}
                Err(CpuError::LaunchDebugger { pc }) => {
                    if let Some(mut debugger) = self.debugger.take() {
                        debugger.launch(self, pc);
                        self.debugger = Some(debugger);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(self.exit_code.unwrap_or(0))
    }

    fn fail(&mut self, inst: Option<&Instruction>, err: ExecError) -> Result<(), CpuError> {
        match err {
            ExecError::Unimplemented { mnemonic } => {
                return Err(CpuError::Unimplemented {
                    mnemonic,
                    pc: self.inst_pc,
                });
            }
            ExecError::LaunchDebugger => {
                return Err(CpuError::LaunchDebugger { pc: self.inst_pc });
            }
            _ => {}
        }

        let encoding = inst.and_then(Instruction::encoding).unwrap_or(0);
        if self.privileged
            && let Some(trap) = err.to_trap(encoding)
        {
            self.pc = self.inst_pc;
            self.raise(trap);
            return Ok(());
        }

        self.halt(1);
        let report = FaultReport {
            pc: self.inst_pc,
            instruction: inst.map_or_else(|| UNFETCHED.to_string(), ToString::to_string),
            error: err,
        };
        error!(
            hart = self.hart_id,
            pc = format_args!("{:#010x}", report.pc),
            instruction = %report.instruction,
            error = %report.error,
            "hart faulted"
        );
        Err(CpuError::Fault(report))
    }
}
