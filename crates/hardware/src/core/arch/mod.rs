//! RISC-V architecture-specific components.
//!
//! This module contains the implementation of core RISC-V architectural elements.
//! It includes the following modules:
//! 1. **CSRs:** Control and Status Register definitions, storage and gating.
//! 2. **FPRs:** Floating-Point Register file implementation.
//! 3. **GPRs:** General-Purpose Register file implementation.
//! 4. **Modes:** Privilege mode definitions.
//! 5. **Traps:** The pending trap queue.
//! 6. **Clock:** Real-time clock and timer compare.

/// Real-time clock and timer compare.
pub mod clock;

/// Control and Status Register (CSR) definitions and access logic.
pub mod csr;

/// Floating-Point Register file implementation.
pub mod fpr;

/// General-Purpose Register file implementation.
pub mod gpr;

/// Privilege mode definitions.
pub mod mode;

/// Pending trap queue.
pub mod trap;
