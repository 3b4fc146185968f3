//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, the container for one hart's entire
//! state. It coordinates the following:
//! 1. **State Management:** Registers, program counter, privilege mode and counters.
//! 2. **Memory:** The MMU address space the hart fetches from and loads/stores into.
//! 3. **Dispatch:** The mnemonic-to-handler table built from the instruction sets.
//! 4. **Boundaries:** The syscall handler and optional debugger the host plugs in.

/// CSR access with privilege gating and side effects.
pub mod csr;

/// Debugger hook.
pub mod debugger;

/// Fetch-execute loop.
pub mod execution;

/// Control transfer and load-reservation helpers.
pub mod memory;

/// Unprivileged system-call boundary.
pub mod syscall;

/// Trap delivery and return.
pub mod trap;

use std::fmt;

use tracing::debug;

use crate::common::error::{CpuError, ExecError, ProgramError, Trap};
use crate::common::RegisterFile;
use crate::config::Config;
use crate::core::arch::clock::{RtClock, Timer};
use crate::core::arch::csr::CsrStore;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::arch::trap::TrapQueue;
use crate::core::units::mmu::Mmu;
use crate::isa::abi::{REG_A0, REG_SP};
use crate::isa::instruction::Instruction;
use crate::isa::registry::{standard_sets, DispatchTable, InstructionSet};
use crate::sim::program::Program;
use crate::soc::memory::MemoryFlags;

pub use debugger::Debugger;
pub use syscall::{BasicSyscalls, Syscall, SyscallHandler, SyscallOutcome};

/// Name of the section allocated for an unprivileged hart's stack.
pub const STACK_SECTION: &str = ".stack";

/// One RV32 hardware thread.
pub struct Cpu {
    /// General Purpose and Floating Point Registers.
    pub regs: RegisterFile,
    /// Program Counter: address of the next instruction to fetch.
    pub pc: u32,
    /// Control and Status Registers.
    pub csrs: CsrStore,
    /// Current Privilege Mode.
    pub privilege: PrivilegeMode,
    /// Address space.
    pub mmu: Mmu,
    /// Cycles executed, including stalled `wfi` cycles.
    pub cycle: u64,
    /// Instructions retired.
    pub instret: u64,
    /// Set once the hart stops; `step` is then a no-op.
    pub halted: bool,
    /// Exit code recorded by the exit syscall or the halt CSR.
    pub exit_code: Option<u32>,
    /// Stalled in `wfi` until an interrupt is pending.
    pub wfi_waiting: bool,
    /// Emit a `trace!` event per retired instruction.
    pub trace: bool,

    inst_pc: u32,
    load_reservation: Option<u32>,
    privileged: bool,
    hart_id: u32,
    max_cycles: Option<u64>,
    stack_size: u32,
    traps: TrapQueue,
    clock: RtClock,
    timer: Timer,
    dispatch: DispatchTable,
    syscalls: Box<dyn SyscallHandler>,
    debugger: Option<Box<dyn Debugger>>,
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu")
            .field("hart_id", &self.hart_id)
            .field("pc", &format_args!("{:#010x}", self.pc))
            .field("privilege", &self.privilege)
            .field("privileged", &self.privileged)
            .field("cycle", &self.cycle)
            .field("instret", &self.instret)
            .field("halted", &self.halted)
            .field("exit_code", &self.exit_code)
            .field("pending_traps", &self.traps.len())
            .field("debugger", &self.debugger.is_some())
            .finish_non_exhaustive()
    }
}

impl Cpu {
    /// Creates a hart with the standard instruction sets.
    ///
    /// # Errors
    ///
    /// `CpuError::DuplicateMnemonic` if the instruction sets overlap.
    pub fn new(config: &Config) -> Result<Self, CpuError> {
        Self::with_instruction_sets(config, &standard_sets())
    }

    /// Creates a hart that dispatches through `sets`.
    ///
    /// Privileged harts start in Machine mode with lazy memory allocation; unprivileged
    /// harts run in User mode and service `ecall` through their syscall handler.
    ///
    /// # Errors
    ///
    /// `CpuError::DuplicateMnemonic` if two sets register the same mnemonic.
    pub fn with_instruction_sets(
        config: &Config,
        sets: &[Box<dyn InstructionSet>],
    ) -> Result<Self, CpuError> {
        let dispatch = DispatchTable::build(sets)?;
        let privileged = config.general.privileged;
        let privilege = if privileged {
            PrivilegeMode::Machine
        } else {
            PrivilegeMode::User
        };
        Ok(Self {
            regs: RegisterFile::new(
                config.registers.flen,
                config.registers.unlimited_registers,
            ),
            pc: 0,
            csrs: CsrStore::new(),
            privilege,
            mmu: Mmu::new(privileged, config.memory.load_alignment),
            cycle: 0,
            instret: 0,
            halted: false,
            exit_code: None,
            wfi_waiting: false,
            trace: config.general.trace_instructions || cfg!(feature = "always-trace"),
            inst_pc: 0,
            load_reservation: None,
            privileged,
            hart_id: config.hart.hart_id,
            max_cycles: config.general.max_cycles,
            stack_size: config.memory.stack_size,
            traps: TrapQueue::new(),
            clock: RtClock::new(config.clock.tick_rate_hz),
            timer: Timer::default(),
            dispatch,
            syscalls: Box::new(BasicSyscalls),
            debugger: None,
        })
    }

    /// Whether this hart runs the privileged trap model.
    pub const fn is_privileged(&self) -> bool {
        self.privileged
    }

    /// Hardware thread id.
    pub const fn hart_id(&self) -> u32 {
        self.hart_id
    }

    /// Address of the instruction currently executing.
    ///
    /// Inside a handler `pc` already points past it.
    pub const fn instruction_pc(&self) -> u32 {
        self.inst_pc
    }

    /// The real-time clock.
    pub const fn clock(&self) -> &RtClock {
        &self.clock
    }

    /// Mutable access to the clock, e.g. to advance it deterministically.
    pub const fn clock_mut(&mut self) -> &mut RtClock {
        &mut self.clock
    }

    /// The hart's dispatch table.
    pub const fn dispatch_table(&self) -> &DispatchTable {
        &self.dispatch
    }

    /// Loads a program into the address space. See `Mmu::load_program`.
    ///
    /// # Errors
    ///
    /// Placement violations.
    pub fn load_program(
        &mut self,
        program: Program,
        base: Option<u32>,
    ) -> Result<u32, ProgramError> {
        self.mmu.load_program(program, base)
    }

    /// Prepares the hart to run.
    ///
    /// `pc` is set to `entry` or the address space's entry point. An unprivileged hart
    /// also gets a stack section with `sp` at its top, and its id in `a0`.
    ///
    /// # Errors
    ///
    /// `CpuError::Launch` if the stack cannot be placed.
    pub fn launch(&mut self, entry: Option<u32>) -> Result<(), CpuError> {
        self.pc = entry.or_else(|| self.mmu.find_entrypoint()).unwrap_or(0);
        if !self.privileged {
            if self.stack_size > 0 && self.mmu.section_named(STACK_SECTION).is_none() {
                let base = self
                    .mmu
                    .allocate_section(STACK_SECTION, self.stack_size, MemoryFlags::DATA)
                    .map_err(CpuError::Launch)?;
                self.regs.write_u(REG_SP, base.wrapping_add(self.stack_size));
            }
            self.regs.write_u(REG_A0, self.hart_id);
        }
        debug!(
            hart = self.hart_id,
            pc = format_args!("{:#010x}", self.pc),
            privilege = %self.privilege,
            "hart launched"
        );
        Ok(())
    }

    /// Stops the hart with `code`.
    pub fn halt(&mut self, code: u32) {
        self.halted = true;
        self.exit_code = Some(code);
        debug!(hart = self.hart_id, code, "hart halted");
    }

    /// Returns and clears the exit code.
    pub const fn take_exit(&mut self) -> Option<u32> {
        self.exit_code.take()
    }

    /// Replaces the system-call handler.
    pub fn set_syscall_handler(&mut self, handler: Box<dyn SyscallHandler>) {
        self.syscalls = handler;
    }

    /// Attaches a debugger, launched by `ebreak`.
    pub fn attach_debugger(&mut self, debugger: Box<dyn Debugger>) {
        self.debugger = Some(debugger);
    }

    /// Detaches and returns the debugger.
    pub fn detach_debugger(&mut self) -> Option<Box<dyn Debugger>> {
        self.debugger.take()
    }

    /// Whether a debugger is attached.
    pub const fn has_debugger(&self) -> bool {
        self.debugger.is_some()
    }

    /// Illegal-instruction error for `inst`.
    #[allow(clippy::unused_self)]
    pub fn illegal(&self, inst: &Instruction) -> ExecError {
        Trap::IllegalInstruction(inst.encoding().unwrap_or(0)).into()
    }

    /// Renders `pc`, the privilege mode and the register file.
    pub fn dump_state(&self) -> String {
        format!(
            "pc = {:#010x} ({}) priv = {}\n{}",
            self.pc,
            self.mmu.translate_address(self.pc),
            self.privilege,
            self.regs.dump()
        )
    }
}
