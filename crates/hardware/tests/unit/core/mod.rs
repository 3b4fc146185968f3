/// Load reservations and read-modify-write atomics.
pub mod atomics;

/// CSR gating, counters and side-effecting registers.
pub mod csr;


/// Fetch-execute loop and fault reporting.
pub mod execution;

/// Address-space bounds, permissions and lazy allocation.
pub mod mmu;

/// Register files and ABI names.
pub mod registers;

/// Unprivileged system calls.
pub mod syscall;

/// Trap entry, return and the timer interrupt.
pub mod trap;
