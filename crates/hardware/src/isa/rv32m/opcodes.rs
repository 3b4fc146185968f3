//! RISC-V Multiply/Divide (M) Opcodes.

/// M-extension instructions share the register-register major opcode.
pub const OP_REG: u32 = crate::isa::rv32i::opcodes::OP_REG;

/// `funct7` marking an M-extension instruction.
pub const M_EXTENSION: u32 = 0b000_0001;
