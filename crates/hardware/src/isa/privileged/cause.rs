//! RISC-V Trap Cause Codes.
//!
//! This module defines the cause codes recorded in `mcause`. Codes are stored bare;
//! the interrupt flag is folded in by `Trap::mcause` as `(code << 1) | interrupt`.

/// Interrupt cause codes.
pub mod interrupt {
    /// User software interrupt.
    pub const USER_SOFTWARE: u32 = 0;

    /// Machine software interrupt.
    pub const MACHINE_SOFTWARE: u32 = 3;

    /// User timer interrupt.
    pub const USER_TIMER: u32 = 4;

    /// Machine timer interrupt.
    pub const MACHINE_TIMER: u32 = 7;

    /// User external interrupt.
    pub const USER_EXTERNAL: u32 = 8;

    /// Machine external interrupt.
    pub const MACHINE_EXTERNAL: u32 = 11;
}

/// Exception cause codes.
pub mod exception {
    /// Instruction address misaligned (0).
    pub const INSTRUCTION_ADDRESS_MISALIGNED: u32 = 0;
    /// Instruction access fault (1).
    pub const INSTRUCTION_ACCESS_FAULT: u32 = 1;
    /// Illegal instruction (2).
    pub const ILLEGAL_INSTRUCTION: u32 = 2;
    /// Breakpoint (3).
    pub const BREAKPOINT: u32 = 3;
    /// Load address misaligned (4).
    pub const LOAD_ADDRESS_MISALIGNED: u32 = 4;
    /// Load access fault (5).
    pub const LOAD_ACCESS_FAULT: u32 = 5;
    /// Store/AMO address misaligned (6).
    pub const STORE_ADDRESS_MISALIGNED: u32 = 6;
    /// Store/AMO access fault (7).
    pub const STORE_ACCESS_FAULT: u32 = 7;
    /// Environment call from U-mode (8).
    pub const ENVIRONMENT_CALL_FROM_U_MODE: u32 = 8;
    /// Environment call from M-mode (11).
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u32 = 11;
}
