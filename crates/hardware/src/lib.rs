//! RV32 hart emulator library.
//!
//! This crate emulates a single 32-bit RISC-V hardware thread with the following:
//! 1. **Decoder:** Raw instruction words to mnemonic plus operands for RV32IMAFD, Zicsr
//!    and the privileged instructions, and the disassembler built on it.
//! 2. **Memory:** A sectioned address space with per-section permissions, relocatable
//!    programs, symbol resolution and lazy allocation for privileged harts.
//! 3. **Architectural state:** Register files, a sparse CSR store with virtual counters,
//!    and the machine-mode trap state machine.
//! 4. **Hart:** The fetch-execute loop dispatching through a mnemonic-to-handler table,
//!    with syscall and debugger boundaries for the host.
//!
//! ```
//! use rv32hart_core::isa::decode::encoding_for;
//! use rv32hart_core::sim::program::Program;
//! use rv32hart_core::soc::memory::{MemoryFlags, MemorySection};
//! use rv32hart_core::{Config, Simulator};
//!
//! let addi = encoding_for("addi").unwrap();
//! let ecall = encoding_for("ecall").unwrap();
//! let words = [
//!     addi.encode(&[10, 0, 7]),  // a0 = 7
//!     addi.encode(&[17, 0, 93]), // a7 = exit
//!     ecall.encode(&[]),
//! ];
//!
//! let mut program = Program::new("demo");
//! program
//!     .add_section(MemorySection::from_words(".text", 0, MemoryFlags::TEXT, &words))
//!     .unwrap();
//!
//! let mut sim = Simulator::new(&Config::default()).unwrap();
//! sim.load(program).unwrap();
//! assert_eq!(sim.run().unwrap(), 7);
//! ```

/// Shared types: constants, register files, data widths and errors.
pub mod common;
/// Hart configuration (JSON-deserialisable, with defaults).
pub mod config;
/// The hart: architectural state, execution loop and MMU.
pub mod core;
/// Instruction set: encodings, decoder, handlers and disassembler.
pub mod isa;
/// Programs and the simulator wrapper.
pub mod sim;
/// Memory sections.
pub mod soc;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// A single hart.
pub use crate::core::Cpu;
/// Simulator that launches and runs a hart.
pub use crate::sim::Simulator;
