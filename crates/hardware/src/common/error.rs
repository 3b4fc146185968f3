//! Trap and Error definitions.
//!
//! This module defines the error handling and trap mechanisms for the emulator. It provides:
//! 1. **Trap Representation:** Synchronous exceptions and asynchronous interrupts of the RV32
//!    machine-mode cause table.
//! 2. **Fault Taxonomy:** Decode, memory, CSR, register, operand, and syscall errors, each
//!    carrying enough context to render a diagnostic without re-deriving state.
//! 3. **Execution Signals:** The handler result type and the errors surfaced by `step`/`run`.

use thiserror::Error;

use super::constants::CAUSE_INTERRUPT_BIT;
use super::data::AccessType;
use crate::core::arch::mode::PrivilegeMode;
use crate::isa::privileged::cause::{exception, interrupt};

/// RISC-V trap types representing exceptions and interrupts.
///
/// Traps cause the processor to transfer control to the machine trap vector.
/// Only the User and Machine privilege levels exist, so supervisor causes are omitted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Trap {
    /// Instruction address misaligned exception. Carries the misaligned address.
    #[error("InstructionAddressMisaligned({0:#x})")]
    InstructionAddressMisaligned(u32),

    /// Instruction access fault. Carries the faulting address (or CSR address for
    /// privilege violations on CSR access).
    #[error("InstructionAccessFault({0:#x})")]
    InstructionAccessFault(u32),

    /// Illegal instruction exception. Carries the instruction encoding.
    #[error("IllegalInstruction({0:#x})")]
    IllegalInstruction(u32),

    /// Breakpoint exception. Carries the program counter.
    #[error("Breakpoint({0:#x})")]
    Breakpoint(u32),

    /// Load address misaligned exception.
    #[error("LoadAddressMisaligned({0:#x})")]
    LoadAddressMisaligned(u32),

    /// Load access fault.
    #[error("LoadAccessFault({0:#x})")]
    LoadAccessFault(u32),

    /// Store/AMO address misaligned exception.
    #[error("StoreAddressMisaligned({0:#x})")]
    StoreAddressMisaligned(u32),

    /// Store/AMO access fault.
    #[error("StoreAccessFault({0:#x})")]
    StoreAccessFault(u32),

    /// Environment call from user mode.
    #[error("EnvironmentCallFromUMode")]
    EnvironmentCallFromUMode,

    /// Environment call from machine mode.
    #[error("EnvironmentCallFromMMode")]
    EnvironmentCallFromMMode,

    /// User software interrupt.
    #[error("UserSoftwareInterrupt")]
    UserSoftwareInterrupt,

    /// Machine software interrupt.
    #[error("MachineSoftwareInterrupt")]
    MachineSoftwareInterrupt,

    /// User timer interrupt.
    #[error("UserTimerInterrupt")]
    UserTimerInterrupt,

    /// Machine timer interrupt.
    #[error("MachineTimerInterrupt")]
    MachineTimerInterrupt,

    /// User external interrupt.
    #[error("UserExternalInterrupt")]
    UserExternalInterrupt,

    /// Machine external interrupt.
    #[error("MachineExternalInterrupt")]
    MachineExternalInterrupt,
}

impl Trap {
    /// Returns the numeric cause code (without the interrupt flag).
    pub const fn code(&self) -> u32 {
        match self {
            Self::InstructionAddressMisaligned(_) => exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Self::InstructionAccessFault(_) => exception::INSTRUCTION_ACCESS_FAULT,
            Self::IllegalInstruction(_) => exception::ILLEGAL_INSTRUCTION,
            Self::Breakpoint(_) => exception::BREAKPOINT,
            Self::LoadAddressMisaligned(_) => exception::LOAD_ADDRESS_MISALIGNED,
            Self::LoadAccessFault(_) => exception::LOAD_ACCESS_FAULT,
            Self::StoreAddressMisaligned(_) => exception::STORE_ADDRESS_MISALIGNED,
            Self::StoreAccessFault(_) => exception::STORE_ACCESS_FAULT,
            Self::EnvironmentCallFromUMode => exception::ENVIRONMENT_CALL_FROM_U_MODE,
            Self::EnvironmentCallFromMMode => exception::ENVIRONMENT_CALL_FROM_M_MODE,
            Self::UserSoftwareInterrupt => interrupt::USER_SOFTWARE,
            Self::MachineSoftwareInterrupt => interrupt::MACHINE_SOFTWARE,
            Self::UserTimerInterrupt => interrupt::USER_TIMER,
            Self::MachineTimerInterrupt => interrupt::MACHINE_TIMER,
            Self::UserExternalInterrupt => interrupt::USER_EXTERNAL,
            Self::MachineExternalInterrupt => interrupt::MACHINE_EXTERNAL,
        }
    }

    /// Returns `true` for asynchronous interrupts, `false` for synchronous exceptions.
    pub const fn is_interrupt(&self) -> bool {
        matches!(
            self,
            Self::UserSoftwareInterrupt
                | Self::MachineSoftwareInterrupt
                | Self::UserTimerInterrupt
                | Self::MachineTimerInterrupt
                | Self::UserExternalInterrupt
                | Self::MachineExternalInterrupt
        )
    }

    /// Returns the auxiliary value written to `mtval` on delivery.
    pub const fn tval(&self) -> u32 {
        match self {
            Self::InstructionAddressMisaligned(v)
            | Self::InstructionAccessFault(v)
            | Self::IllegalInstruction(v)
            | Self::Breakpoint(v)
            | Self::LoadAddressMisaligned(v)
            | Self::LoadAccessFault(v)
            | Self::StoreAddressMisaligned(v)
            | Self::StoreAccessFault(v) => *v,
            _ => 0,
        }
    }

    /// Returns the value written to `mcause`: `(code << 1) | interrupt`.
    pub const fn mcause(&self) -> u32 {
        let flag = if self.is_interrupt() {
            CAUSE_INTERRUPT_BIT
        } else {
            0
        };
        (self.code() << 1) | flag
    }

    /// Maps an access kind to its access-fault trap.
    pub const fn access_fault(access: AccessType, addr: u32) -> Self {
        match access {
            AccessType::Fetch => Self::InstructionAccessFault(addr),
            AccessType::Read => Self::LoadAccessFault(addr),
            AccessType::Write => Self::StoreAccessFault(addr),
        }
    }
}

/// Errors raised while decoding a raw instruction word.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No opcode table entry matches the encoding.
    #[error("illegal instruction {word:#010x}")]
    IllegalInstruction {
        /// The raw encoding.
        word: u32,
    },
}

impl DecodeError {
    /// Converts the decode failure into its architectural trap.
    pub const fn to_trap(&self) -> Trap {
        match self {
            Self::IllegalInstruction { word } => Trap::IllegalInstruction(*word),
        }
    }
}

/// Errors raised by the MMU and memory sections.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// The access range is not fully contained in a single section.
    #[error("{access} of {size} byte(s) at {addr:#010x} is out of bounds")]
    OutOfBounds {
        /// First byte of the access.
        addr: u32,
        /// Access width in bytes.
        size: u32,
        /// Kind of access.
        access: AccessType,
    },

    /// A write targeted a read-only section.
    #[error("write of {size} byte(s) at {addr:#010x} hits read-only section `{section}`")]
    ReadOnly {
        /// First byte of the access.
        addr: u32,
        /// Access width in bytes.
        size: u32,
        /// Name of the section.
        section: String,
    },

    /// A fetch targeted a section without the executable flag.
    #[error("fetch at {addr:#010x} from non-executable section `{section}`")]
    NotExecutable {
        /// Fetch address.
        addr: u32,
        /// Name of the section.
        section: String,
    },

    /// A fetch address is not 4-byte aligned.
    #[error("misaligned instruction fetch at {addr:#010x}")]
    MisalignedFetch {
        /// Fetch address.
        addr: u32,
    },

    /// A raw byte access targeted a section holding pre-decoded instructions.
    #[error("raw {access} at {addr:#010x} in instruction section `{section}`")]
    RawAccessToInstructions {
        /// First byte of the access.
        addr: u32,
        /// Kind of access.
        access: AccessType,
        /// Name of the section.
        section: String,
    },

    /// No gap in the address space can hold a requested allocation.
    #[error("no free region of {size} byte(s) for section `{name}`")]
    OutOfMemory {
        /// Requested section name.
        name: String,
        /// Requested size.
        size: u32,
    },

    /// A raw section word failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl MemoryError {
    /// Converts the memory failure into its architectural trap.
    pub fn to_trap(&self) -> Trap {
        match self {
            Self::OutOfBounds { addr, access, .. }
            | Self::RawAccessToInstructions { addr, access, .. } => {
                Trap::access_fault(*access, *addr)
            }
            Self::ReadOnly { addr, .. } => Trap::StoreAccessFault(*addr),
            Self::NotExecutable { addr, .. } => Trap::InstructionAccessFault(*addr),
            Self::MisalignedFetch { addr } => Trap::InstructionAddressMisaligned(*addr),
            Self::OutOfMemory { .. } => Trap::StoreAccessFault(0),
            Self::Decode(e) => e.to_trap(),
        }
    }
}

/// Errors raised by CSR privilege gating.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CsrError {
    /// The CSR's privilege field exceeds the requesting mode.
    #[error("csr {addr:#05x} is not accessible from {mode} mode")]
    InsufficientPrivilege {
        /// 12-bit CSR address.
        addr: u32,
        /// Mode that attempted the access.
        mode: PrivilegeMode,
    },

    /// A write targeted a CSR whose address marks it read-only.
    #[error("csr {addr:#05x} is read-only")]
    ReadOnly {
        /// 12-bit CSR address.
        addr: u32,
    },
}

impl CsrError {
    /// CSR violations surface as instruction access faults carrying the CSR address.
    pub const fn to_trap(&self) -> Trap {
        match self {
            Self::InsufficientPrivilege { addr, .. } | Self::ReadOnly { addr } => {
                Trap::InstructionAccessFault(*addr)
            }
        }
    }
}

/// Errors raised by name-based register access.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The name is not part of the register set.
    #[error("unknown register `{name}`")]
    Unknown {
        /// Offending name.
        name: String,
    },
}

/// Errors raised while interpreting instruction operands.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OperandError {
    /// The instruction has fewer operands than the handler expects.
    #[error("`{mnemonic}` is missing operand {index}")]
    Missing {
        /// Instruction mnemonic.
        mnemonic: String,
        /// Zero-based operand index.
        index: usize,
    },

    /// The operand does not name an integer register.
    #[error("`{token}` is not an integer register")]
    NotARegister {
        /// Operand text.
        token: String,
    },

    /// The operand does not name a floating-point register.
    #[error("`{token}` is not a floating-point register")]
    NotAFloatRegister {
        /// Operand text.
        token: String,
    },

    /// The operand is neither a known symbol nor a numeric literal.
    #[error("`{token}` is neither a symbol nor a number")]
    NotAnImmediate {
        /// Operand text.
        token: String,
    },

    /// The operand does not name a CSR.
    #[error("`{token}` is not a csr")]
    NotACsr {
        /// Operand text.
        token: String,
    },
}

/// Errors raised by a syscall handler.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyscallError {
    /// The handler does not know this syscall number.
    #[error("unknown syscall {id}")]
    Unknown {
        /// Syscall number read from `a7`.
        id: u32,
    },

    /// The handler recognised the syscall but could not complete it.
    #[error("syscall {id} failed: {reason}")]
    Failed {
        /// Syscall number read from `a7`.
        id: u32,
        /// Human-readable cause.
        reason: String,
    },
}

/// Result of a single instruction handler.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The handler raised an architectural trap.
    #[error("trap: {0}")]
    Trap(#[from] Trap),

    /// A memory access failed.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// A raw word failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A CSR access violated privilege gating.
    #[error(transparent)]
    Csr(#[from] CsrError),

    /// A register name was rejected.
    #[error(transparent)]
    Register(#[from] RegisterError),

    /// An operand could not be interpreted.
    #[error(transparent)]
    Operand(#[from] OperandError),

    /// The syscall boundary failed.
    #[error(transparent)]
    Syscall(#[from] SyscallError),

    /// The mnemonic is recognised but has no behaviour yet.
    #[error("unimplemented instruction `{mnemonic}`")]
    Unimplemented {
        /// Instruction mnemonic.
        mnemonic: String,
    },

    /// A debug break asks the outer run loop to open the debugger.
    #[error("debugger launch requested")]
    LaunchDebugger,
}

impl ExecError {
    /// Converts the failure into an architectural trap, if it has one.
    ///
    /// `encoding` is the raw instruction word used as `mtval` for operand and
    /// register failures. Unimplemented, debugger and syscall signals return `None`.
    pub fn to_trap(&self, encoding: u32) -> Option<Trap> {
        match self {
            Self::Trap(t) => Some(t.clone()),
            Self::Memory(e) => Some(e.to_trap()),
            Self::Decode(e) => Some(e.to_trap()),
            Self::Csr(e) => Some(e.to_trap()),
            Self::Register(_) | Self::Operand(_) => Some(Trap::IllegalInstruction(encoding)),
            Self::Syscall(_) | Self::Unimplemented { .. } | Self::LaunchDebugger => None,
        }
    }
}

/// Diagnostic for a fault that halted an unprivileged hart.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{error} at pc {pc:#010x} [{instruction}]")]
pub struct FaultReport {
    /// Program counter of the faulting instruction.
    pub pc: u32,
    /// Disassembled instruction text, or a placeholder if the fetch itself failed.
    pub instruction: String,
    /// Underlying failure.
    pub error: ExecError,
}

/// Errors surfaced by `Cpu::step` and `Cpu::run`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CpuError {
    /// An unprivileged hart halted on a decode, memory, CSR or syscall failure.
    #[error(transparent)]
    Fault(FaultReport),

    /// A recognised instruction has no behaviour. The pc already points past it.
    #[error("unimplemented instruction `{mnemonic}` at {pc:#010x}")]
    Unimplemented {
        /// Instruction mnemonic.
        mnemonic: String,
        /// Address of the instruction.
        pc: u32,
    },

    /// A debug break was hit with a debugger attached.
    #[error("debugger launch requested at {pc:#010x}")]
    LaunchDebugger {
        /// Address of the break instruction.
        pc: u32,
    },

    /// The dispatch table has no handler for a fetched mnemonic.
    #[error("no handler registered for `{mnemonic}` at {pc:#010x}")]
    UnknownMnemonic {
        /// Instruction mnemonic.
        mnemonic: String,
        /// Address of the instruction.
        pc: u32,
    },

    /// Two instruction sets registered the same mnemonic.
    #[error("mnemonic `{mnemonic}` registered by both `{first}` and `{second}`")]
    DuplicateMnemonic {
        /// Conflicting mnemonic.
        mnemonic: String,
        /// Instruction set registered first.
        first: &'static str,
        /// Instruction set registered second.
        second: &'static str,
    },

    /// The hart could not be prepared for launch (stack allocation failed).
    #[error("failed to launch hart: {0}")]
    Launch(MemoryError),

    /// The configured cycle budget was exhausted.
    #[error("cycle limit of {limit} reached at {pc:#010x}")]
    CycleLimit {
        /// Configured limit.
        limit: u64,
        /// Program counter when the limit hit.
        pc: u32,
    },
}

/// Errors raised while building or placing programs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// Two sections of the same address space overlap.
    #[error("section `{name}` at {base:#010x} (+{size:#x}) overlaps `{other}`")]
    Overlap {
        /// Section being inserted.
        name: String,
        /// Its base address.
        base: u32,
        /// Its size.
        size: u32,
        /// Section already present.
        other: String,
    },

    /// A program with a fixed base was asked to move.
    #[error("program `{program}` is fixed at {fixed:#010x} and cannot move to {requested:#010x}")]
    Relocation {
        /// Program name.
        program: String,
        /// Base it is fixed at.
        fixed: u32,
        /// Base that was requested.
        requested: u32,
    },

    /// Two programs export the same global label.
    #[error("global symbol `{name}` is exported twice")]
    DuplicateGlobal {
        /// Symbol name.
        name: String,
    },

    /// Placement would push a section past the end of the address space.
    #[error("section `{name}` does not fit in the 32-bit address space")]
    AddressOverflow {
        /// Section name.
        name: String,
    },
}
