//! Simulator: owns a hart and launches it on first use.
//!
//! Programs are loaded before the first `step` or `run`; the hart is launched lazily so
//! that the entry point and stack placement see every loaded program.

use crate::common::error::{CpuError, ProgramError};
use crate::config::Config;
use crate::core::Cpu;
use crate::core::cpu::{Debugger, SyscallHandler};
use crate::sim::program::Program;

/// Top-level simulator around a single hart.
#[derive(Debug)]
pub struct Simulator {
    /// The hart (registers, CSRs, address space).
    pub cpu: Cpu,
    launched: bool,
}

impl Simulator {
    /// Creates a simulator with the standard instruction sets.
    ///
    /// # Errors
    ///
    /// Propagates `Cpu::new` failures.
    pub fn new(config: &Config) -> Result<Self, CpuError> {
        Ok(Self::from_cpu(Cpu::new(config)?))
    }

    /// Wraps an already configured hart.
    pub const fn from_cpu(cpu: Cpu) -> Self {
        Self {
            cpu,
            launched: false,
        }
    }

    /// Loads a program wherever it fits. Returns its base address.
    ///
    /// # Errors
    ///
    /// Placement violations.
    pub fn load(&mut self, program: Program) -> Result<u32, ProgramError> {
        self.cpu.load_program(program, None)
    }

    /// Loads a program at `base`.
    ///
    /// # Errors
    ///
    /// Placement violations, or a fixed program asked to move.
    pub fn load_at(&mut self, program: Program, base: u32) -> Result<u32, ProgramError> {
        self.cpu.load_program(program, Some(base))
    }

    /// Attaches a debugger, launched by `ebreak`.
    pub fn attach_debugger(&mut self, debugger: Box<dyn Debugger>) {
        self.cpu.attach_debugger(debugger);
    }

    /// Replaces the system-call handler.
    pub fn set_syscall_handler(&mut self, handler: Box<dyn SyscallHandler>) {
        self.cpu.set_syscall_handler(handler);
    }

    /// Whether the hart has been launched.
    pub const fn is_launched(&self) -> bool {
        self.launched
    }

    fn ensure_launched(&mut self) -> Result<(), CpuError> {
        if !self.launched {
            self.cpu.launch(None)?;
            self.launched = true;
        }
        Ok(())
    }

    /// Advances the hart by one cycle.
    ///
    /// # Errors
    ///
    /// See `Cpu::step`.
    pub fn step(&mut self) -> Result<(), CpuError> {
        self.ensure_launched()?;
        self.cpu.step()
    }

    /// Runs to completion and returns the exit code.
    ///
    /// # Errors
    ///
    /// See `Cpu::run`.
    pub fn run(&mut self) -> Result<u32, CpuError> {
        self.ensure_launched()?;
        self.cpu.run()
    }

    /// Retrieves the exit code if the hart has halted.
    pub const fn take_exit(&mut self) -> Option<u32> {
        self.cpu.take_exit()
    }
}
