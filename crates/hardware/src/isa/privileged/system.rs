//! Environment calls, breakpoints, trap returns and `wfi`.

use crate::common::error::{ExecError, Trap};
use crate::core::arch::mode::PrivilegeMode;
use crate::core::Cpu;
use crate::isa::instruction::Instruction;
use crate::isa::registry::{instruction_table, Handler, InstructionSet};

/// System instruction handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct System;

impl InstructionSet for System {
    fn name(&self) -> &'static str {
        "system"
    }

    fn load(&self) -> Vec<(String, Handler)> {
        instruction_table![ecall, ebreak, mret, sret, uret, wfi]
    }
}

/// Unprivileged harts service the call themselves; privileged ones trap.
fn ecall(cpu: &mut Cpu, _inst: &Instruction) -> Result<(), ExecError> {
    if !cpu.is_privileged() {
        return cpu.syscall();
    }
    let trap = match cpu.privilege {
        PrivilegeMode::User => Trap::EnvironmentCallFromUMode,
        PrivilegeMode::Machine => Trap::EnvironmentCallFromMMode,
    };
    Err(trap.into())
}

fn ebreak(cpu: &mut Cpu, _inst: &Instruction) -> Result<(), ExecError> {
    if cpu.has_debugger() {
        return Err(ExecError::LaunchDebugger);
    }
    Ok(())
}

fn mret(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    if cpu.privilege != PrivilegeMode::Machine {
        return Err(cpu.illegal(inst));
    }
    cpu.return_from_trap();
    Ok(())
}

fn sret(_cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    Err(ExecError::Unimplemented {
        mnemonic: inst.mnemonic().to_string(),
    })
}

fn uret(_cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    Err(ExecError::Unimplemented {
        mnemonic: inst.mnemonic().to_string(),
    })
}

// Unprivileged harts never take interrupts; `wfi` is a hint there.
fn wfi(cpu: &mut Cpu, _inst: &Instruction) -> Result<(), ExecError> {
    cpu.wfi_waiting = cpu.is_privileged();
    Ok(())
}
