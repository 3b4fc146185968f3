//! RISC-V Application Binary Interface (ABI) register names.
//!
//! Defines standard RISC-V ABI register names and their corresponding
//! register indices for use in system calls, bootstrap, and operand parsing.

/// Register x0 (zero register, always zero).
pub const REG_ZERO: usize = 0;
/// Register x1 (return address, ra).
pub const REG_RA: usize = 1;
/// Register x2 (stack pointer, sp).
pub const REG_SP: usize = 2;
/// Register x8 (saved register / frame pointer, s0).
pub const REG_S0: usize = 8;
/// Register x10 (first argument/return value, a0).
pub const REG_A0: usize = 10;
/// Register x11 (second argument, a1).
pub const REG_A1: usize = 11;
/// Register x12 (third argument, a2).
pub const REG_A2: usize = 12;
/// Register x17 (system call number, a7).
pub const REG_A7: usize = 17;

/// ABI names of the integer registers, indexed by register number.
pub const GPR_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// ABI names of the floating-point registers, indexed by register number.
pub const FPR_NAMES: [&str; 32] = [
    "ft0", "ft1", "ft2", "ft3", "ft4", "ft5", "ft6", "ft7", "fs0", "fs1", "fa0", "fa1", "fa2",
    "fa3", "fa4", "fa5", "fa6", "fa7", "fs2", "fs3", "fs4", "fs5", "fs6", "fs7", "fs8", "fs9",
    "fs10", "fs11", "ft8", "ft9", "ft10", "ft11",
];

/// Frame-pointer alias, rewritten to `s0` before lookup.
pub const FRAME_POINTER_ALIAS: &str = "fp";

/// Resolves an integer register name to its index.
///
/// Accepts ABI names, the `fp` alias and numeric `xN` names.
pub fn gpr_index(name: &str) -> Option<usize> {
    if name == FRAME_POINTER_ALIAS {
        return Some(REG_S0);
    }
    if let Some(idx) = GPR_NAMES.iter().position(|n| *n == name) {
        return Some(idx);
    }
    numbered(name, 'x')
}

/// Resolves a floating-point register name to its index.
///
/// Accepts ABI names and numeric `fN` names.
pub fn fpr_index(name: &str) -> Option<usize> {
    FPR_NAMES
        .iter()
        .position(|n| *n == name)
        .or_else(|| numbered(name, 'f'))
}

/// ABI name of integer register `idx`.
pub fn gpr_name(idx: usize) -> &'static str {
    GPR_NAMES.get(idx).copied().unwrap_or("x?")
}

/// ABI name of floating-point register `idx`.
pub fn fpr_name(idx: usize) -> &'static str {
    FPR_NAMES.get(idx).copied().unwrap_or("f?")
}

fn numbered(name: &str, prefix: char) -> Option<usize> {
    let digits = name.strip_prefix(prefix)?;
    if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|idx| *idx < 32)
}
