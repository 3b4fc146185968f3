//! RISC-V Base Integer (I) Function Codes (funct7).

/// Default `funct7` (ADD, SRL, SLLI, ...).
pub const DEFAULT: u32 = 0b000_0000;

/// Alternate `funct7` selecting SUB and SRA/SRAI.
pub const SUB_SRA: u32 = 0b010_0000;
