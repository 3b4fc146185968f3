//! Global Hart Constants.
//!
//! This module defines constants shared across the emulator. It includes:
//! 1. **Instruction Constants:** Fixed instruction width and encoding masks.
//! 2. **Address Space Constants:** Bounds and windows used by the MMU.
//! 3. **Trap Constants:** Interrupt flag encoding for the cause register.
//! 4. **Bootstrap Constants:** Default stack size and load alignment.

/// Size of every RV32 instruction in bytes (no compressed encodings).
pub const INSTRUCTION_SIZE: u32 = 4;

/// Number of integer and floating-point architectural registers.
pub const REGISTER_COUNT: usize = 32;

/// Bit mask selecting the two low bits of a 32-bit (non-compressed) encoding.
pub const ENCODING_LOW_BITS_MASK: u32 = 0b11;

/// Required value of the two low encoding bits for 32-bit instructions.
pub const ENCODING_LOW_BITS_32: u32 = 0b11;

/// Exclusive upper bound of the address space the lazy allocator may cover.
pub const ADDRESS_SPACE_END: u64 = 0x7FFF_FFFF;

/// Half-width of the window synthesized around a faulting address.
pub const LAZY_SECTION_WINDOW: u64 = 0xFFFF;

/// Alignment of lazily synthesized sections.
pub const LAZY_SECTION_ALIGN: u64 = 16;

/// Name given to lazily synthesized sections.
pub const LAZY_SECTION_NAME: &str = ".empty";

/// Value OR-ed into the low bit of `mcause` for interrupts.
pub const CAUSE_INTERRUPT_BIT: u32 = 1;

/// Default stack size allocated for unprivileged harts (512 KiB).
pub const DEFAULT_STACK_SIZE: u32 = 512 * 1024;

/// Default alignment for automatic program placement.
pub const DEFAULT_LOAD_ALIGNMENT: u32 = 0x1000;

/// Default real-time clock rate (1 MHz).
pub const DEFAULT_TICK_RATE_HZ: u64 = 1_000_000;

/// Linux-style `exit` syscall number.
pub const SYSCALL_EXIT: u32 = 93;
