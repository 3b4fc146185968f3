//! RISC-V Standard Extension for Single-Precision Floating-Point (F).
//!
//! # Structure
//!
//! - `opcodes`, `funct3`, `funct7`: Encoding constants, shared with the D extension.
//! - `float`: The precision-generic register view and `fclass`.
//! - `flags`, `rounding`: Accrued exception flags and rounding modes.
//! - `ops`: Handler bodies shared by F and D.
//!
//! Single-precision values occupy the low word of a 64-bit float register; the upper
//! word is zero, not a NaN box.

/// Floating-point exception flags.
pub mod flags;

/// Precision-generic float register access and classification.
pub mod float;

/// Floating-point `funct3` definitions.
pub mod funct3;

/// Single-precision `funct7` definitions.
pub mod funct7;

/// Floating-point opcodes.
pub mod opcodes;

/// Handler bodies shared with the D extension.
pub mod ops;

/// Rounding modes and float-to-integer conversion.
pub mod rounding;

use crate::common::error::ExecError;
use crate::core::Cpu;
use crate::isa::decode::{Encoding, Selector};
use crate::isa::instruction::{Format, Instruction};
use crate::isa::registry::{instruction_table, Handler, InstructionSet};
use funct7::{RS2_SIGNED, RS2_UNSIGNED};
use opcodes::{FMT_S, OP_FMADD, OP_FMSUB, OP_FNMADD, OP_FNMSUB, OP_FP, OP_LOAD_FP, OP_STORE_FP};
use ops::{Compare, Fused, SignSource};

/// Operand 0 is a float register.
const F_RD: u8 = 0b0001;
/// Operand 1 is a float register.
const F_RS1: u8 = 0b0010;
/// Operands 0 and 1 are float registers.
const F_UNARY: u8 = 0b0011;
/// Operands 1 and 2 are float registers.
const F_SOURCES: u8 = 0b0110;
/// Operands 0 through 2 are float registers.
const F_BINARY: u8 = 0b0111;
/// Operands 0 through 3 are float registers.
const F_FUSED: u8 = 0b1111;

const fn op(mnemonic: &'static str, f3: Option<u32>, selector: Selector, format: Format) -> Encoding {
    Encoding::new(mnemonic, OP_FP, f3, selector, format)
}

/// Opcode table rows for RV32F.
pub const ENCODINGS: &[Encoding] = &[
    Encoding::new("flw", OP_LOAD_FP, Some(funct3::WIDTH_W), Selector::None, Format::Load)
        .with_fregs(F_RD),
    Encoding::new("fsw", OP_STORE_FP, Some(funct3::WIDTH_W), Selector::None, Format::S)
        .with_fregs(F_RD),
    Encoding::new("fmadd.s", OP_FMADD, None, Selector::Fmt(FMT_S), Format::R4).with_fregs(F_FUSED),
    Encoding::new("fmsub.s", OP_FMSUB, None, Selector::Fmt(FMT_S), Format::R4).with_fregs(F_FUSED),
    Encoding::new("fnmsub.s", OP_FNMSUB, None, Selector::Fmt(FMT_S), Format::R4)
        .with_fregs(F_FUSED),
    Encoding::new("fnmadd.s", OP_FNMADD, None, Selector::Fmt(FMT_S), Format::R4)
        .with_fregs(F_FUSED),
    op("fadd.s", None, Selector::Funct7(funct7::FADD), Format::R).with_fregs(F_BINARY),
    op("fsub.s", None, Selector::Funct7(funct7::FSUB), Format::R).with_fregs(F_BINARY),
    op("fmul.s", None, Selector::Funct7(funct7::FMUL), Format::R).with_fregs(F_BINARY),
    op("fdiv.s", None, Selector::Funct7(funct7::FDIV), Format::R).with_fregs(F_BINARY),
    op("fsqrt.s", None, Selector::Funct7Rs2(funct7::FSQRT, 0), Format::RUnary)
        .with_fregs(F_UNARY),
    op("fsgnj.s", Some(funct3::FSGNJ), Selector::Funct7(funct7::FSGNJ), Format::R)
        .with_fregs(F_BINARY),
    op("fsgnjn.s", Some(funct3::FSGNJN), Selector::Funct7(funct7::FSGNJ), Format::R)
        .with_fregs(F_BINARY),
    op("fsgnjx.s", Some(funct3::FSGNJX), Selector::Funct7(funct7::FSGNJ), Format::R)
        .with_fregs(F_BINARY),
    op("fmin.s", Some(funct3::FMIN), Selector::Funct7(funct7::FMIN_MAX), Format::R)
        .with_fregs(F_BINARY),
    op("fmax.s", Some(funct3::FMAX), Selector::Funct7(funct7::FMIN_MAX), Format::R)
        .with_fregs(F_BINARY),
    op("fcvt.w.s", None, Selector::Funct7Rs2(funct7::FCVT_W, RS2_SIGNED), Format::RUnary)
        .with_fregs(F_RS1),
    op("fcvt.wu.s", None, Selector::Funct7Rs2(funct7::FCVT_W, RS2_UNSIGNED), Format::RUnary)
        .with_fregs(F_RS1),
    op("fmv.x.w", Some(funct3::FMV_X), Selector::Funct7Rs2(funct7::FMV_X_CLASS, 0), Format::RUnary)
        .with_fregs(F_RS1),
    op("fclass.s", Some(funct3::FCLASS), Selector::Funct7Rs2(funct7::FMV_X_CLASS, 0), Format::RUnary)
        .with_fregs(F_RS1),
    op("feq.s", Some(funct3::FEQ), Selector::Funct7(funct7::FCMP), Format::R).with_fregs(F_SOURCES),
    op("flt.s", Some(funct3::FLT), Selector::Funct7(funct7::FCMP), Format::R).with_fregs(F_SOURCES),
    op("fle.s", Some(funct3::FLE), Selector::Funct7(funct7::FCMP), Format::R).with_fregs(F_SOURCES),
    op("fcvt.s.w", None, Selector::Funct7Rs2(funct7::FCVT_FROM_W, RS2_SIGNED), Format::RUnary)
        .with_fregs(F_RD),
    op("fcvt.s.wu", None, Selector::Funct7Rs2(funct7::FCVT_FROM_W, RS2_UNSIGNED), Format::RUnary)
        .with_fregs(F_RD),
    op("fmv.w.x", Some(funct3::FMV_X), Selector::Funct7Rs2(funct7::FMV_W_X, 0), Format::RUnary)
        .with_fregs(F_RD),
];

/// Single-precision handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rv32f;

impl InstructionSet for Rv32f {
    fn name(&self) -> &'static str {
        "rv32f"
    }

    fn load(&self) -> Vec<(String, Handler)> {
        instruction_table![
            flw, fsw, fmadd_s, fmsub_s, fnmsub_s, fnmadd_s, fadd_s, fsub_s, fmul_s, fdiv_s,
            fsqrt_s, fsgnj_s, fsgnjn_s, fsgnjx_s, fmin_s, fmax_s, fcvt_w_s, fcvt_wu_s, fmv_x_w,
            fclass_s, feq_s, flt_s, fle_s, fcvt_s_w, fcvt_s_wu, fmv_w_x,
        ]
    }
}

fn flw(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::load::<f32>(cpu, inst)
}

fn fsw(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::store::<f32>(cpu, inst)
}

fn fmadd_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::fused::<f32>(cpu, inst, Fused::MulAdd)
}

fn fmsub_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::fused::<f32>(cpu, inst, Fused::MulSub)
}

fn fnmsub_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::fused::<f32>(cpu, inst, Fused::NegMulSub)
}

fn fnmadd_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::fused::<f32>(cpu, inst, Fused::NegMulAdd)
}

fn fadd_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::binary::<f32>(cpu, inst, |a, b| a + b)
}

fn fsub_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::binary::<f32>(cpu, inst, |a, b| a - b)
}

fn fmul_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::binary::<f32>(cpu, inst, |a, b| a * b)
}

fn fdiv_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::divide::<f32>(cpu, inst)
}

fn fsqrt_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::sqrt::<f32>(cpu, inst)
}

fn fsgnj_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::sign_inject::<f32>(cpu, inst, SignSource::Copy)
}

fn fsgnjn_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::sign_inject::<f32>(cpu, inst, SignSource::Negate)
}

fn fsgnjx_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::sign_inject::<f32>(cpu, inst, SignSource::Xor)
}

fn fmin_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::min_max::<f32>(cpu, inst, false)
}

fn fmax_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::min_max::<f32>(cpu, inst, true)
}

fn fcvt_w_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::to_integer::<f32>(cpu, inst, true)
}

fn fcvt_wu_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::to_integer::<f32>(cpu, inst, false)
}

fn fmv_x_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let bits = cpu.regs.read_f32(inst.freg(1)?).to_bits();
    cpu.regs.write_u(rd, bits);
    Ok(())
}

fn fclass_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::classify::<f32>(cpu, inst)
}

fn feq_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::compare::<f32>(cpu, inst, Compare::Eq)
}

fn flt_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::compare::<f32>(cpu, inst, Compare::Lt)
}

fn fle_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::compare::<f32>(cpu, inst, Compare::Le)
}

fn fcvt_s_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::from_integer::<f32>(cpu, inst, true)
}

fn fcvt_s_wu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    ops::from_integer::<f32>(cpu, inst, false)
}

fn fmv_w_x(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let bits = cpu.regs.read_u(inst.reg(1)?);
    cpu.regs.write_f32(rd, f32::from_bits(bits));
    Ok(())
}
