//! Common utilities and types used throughout the hart emulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the emulator. It includes:
//! 1. **Constants:** System-wide constants for memory, instructions, and traps.
//! 2. **Memory Access:** Definitions for categorizing memory operations (Fetch/Read/Write).
//! 3. **Error Handling:** Trap representations and the per-component error enums.
//! 4. **Register Management:** A unified interface for GPR and FPR access.

/// Common constants used throughout the emulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types and trap definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use data::AccessType;
pub use error::{
    CpuError, CsrError, DecodeError, ExecError, FaultReport, MemoryError, OperandError,
    ProgramError, RegisterError, SyscallError, Trap,
};
pub use reg::RegisterFile;
