//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains field extraction, the opcode tables, the decoder, the instruction model and
//! the handler sets, organized by RISC-V extension.
//!
//! # Extensions
//!
//! * `rv32i`: Base Integer Instruction Set (32-bit), plus assembler pseudo-instructions.
//! * `rv32m`: Standard Extension for Integer Multiplication and Division.
//! * `rv32a`: Standard Extension for Atomic Instructions.
//! * `rv32f`: Standard Extension for Single-Precision Floating-Point.
//! * `rv32d`: Standard Extension for Double-Precision Floating-Point.
//! * `zicsr`: Control and Status Register Instructions.
//! * `privileged`: Privileged Architecture (trap causes, system instructions).

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Instruction decoding logic for all RISC-V instruction formats.
pub mod decode;

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Instruction model, field extraction and operand access.
pub mod instruction;

/// Privileged architecture definitions (trap causes, system instructions).
pub mod privileged;

/// Instruction-set registry and dispatch table.
pub mod registry;

/// Atomic memory operations extension (AMO instructions).
pub mod rv32a;

/// Double-precision floating-point extension.
pub mod rv32d;

/// Single-precision floating-point extension.
pub mod rv32f;

/// Base integer instruction set.
pub mod rv32i;

/// Integer multiply/divide extension (MUL, DIV, REM instructions).
pub mod rv32m;

/// CSR access instructions.
pub mod zicsr;
