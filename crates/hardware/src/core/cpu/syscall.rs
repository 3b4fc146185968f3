//! Unprivileged System Calls.
//!
//! An unprivileged hart has no trap handler to run. Its `ecall` is handed to a
//! `SyscallHandler` with the call number from `a7` and arguments from `a0`-`a2`.

use super::Cpu;
use crate::common::constants::SYSCALL_EXIT;
use crate::common::error::{ExecError, SyscallError};
use crate::core::units::mmu::Mmu;
use crate::isa::abi::{REG_A0, REG_A1, REG_A2, REG_A7};

/// An `ecall` as seen by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Syscall {
    /// Call number (`a7`).
    pub id: u32,
    /// Arguments (`a0`, `a1`, `a2`).
    pub args: [u32; 3],
}

/// What the hart does after a system call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyscallOutcome {
    /// Write the value into `a0` and continue.
    Return(i32),
    /// Halt with the given exit code.
    Exit(u32),
}

/// Host-side implementation of the system-call interface.
pub trait SyscallHandler {
    /// Services one call. The handler may read or write guest memory through `mmu`.
    fn handle(&mut self, call: &Syscall, mmu: &mut Mmu) -> Result<SyscallOutcome, SyscallError>;
}

/// Handler that only knows `exit` (93).
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicSyscalls;

impl SyscallHandler for BasicSyscalls {
    fn handle(&mut self, call: &Syscall, _mmu: &mut Mmu) -> Result<SyscallOutcome, SyscallError> {
        match call.id {
            SYSCALL_EXIT => Ok(SyscallOutcome::Exit(call.args[0])),
            id => Err(SyscallError::Unknown { id }),
        }
    }
}

impl Cpu {
    /// Performs the system call described by `a7` and `a0`-`a2`.
    pub(crate) fn syscall(&mut self) -> Result<(), ExecError> {
        let call = Syscall {
            id: self.regs.read_u(REG_A7),
            args: [
                self.regs.read_u(REG_A0),
                self.regs.read_u(REG_A1),
                self.regs.read_u(REG_A2),
            ],
        };
        match self.syscalls.handle(&call, &mut self.mmu)? {
            SyscallOutcome::Return(value) => {
                self.regs.write(REG_A0, value);
            }
            SyscallOutcome::Exit(code) => self.halt(code),
        }
        Ok(())
    }
}
