//! RISC-V Standard Extension for Double-Precision Floating-Point (D).
//!
//! The handlers are always registered. On a hart whose float registers are 32 bits
//! wide every D instruction is illegal.

/// Double-precision `funct7` definitions.
pub mod funct7;

use crate::common::error::ExecError;
use crate::core::arch::fpr::FloatWidth;
use crate::core::Cpu;
use crate::isa::decode::{Encoding, Selector};
use crate::isa::instruction::{Format, Instruction};
use crate::isa::registry::{instruction_table, Handler, InstructionSet};
use crate::isa::rv32f::funct3;
use crate::isa::rv32f::funct7::{RS2_SIGNED, RS2_UNSIGNED};
use crate::isa::rv32f::opcodes::{
    FMT_D, OP_FMADD, OP_FMSUB, OP_FNMADD, OP_FNMSUB, OP_FP, OP_LOAD_FP, OP_STORE_FP,
};
use crate::isa::rv32f::ops::{self, Compare, Fused, SignSource};

const fn op(mnemonic: &'static str, f3: Option<u32>, selector: Selector, format: Format) -> Encoding {
    Encoding::new(mnemonic, OP_FP, f3, selector, format)
}

const fn fused(mnemonic: &'static str, opcode: u32) -> Encoding {
    Encoding::new(mnemonic, opcode, None, Selector::Fmt(FMT_D), Format::R4).with_fregs(0b1111)
}

/// Opcode table rows for RV32D.
pub const ENCODINGS: &[Encoding] = &[
    Encoding::new("fld", OP_LOAD_FP, Some(funct3::WIDTH_D), Selector::None, Format::Load)
        .with_fregs(0b0001),
    Encoding::new("fsd", OP_STORE_FP, Some(funct3::WIDTH_D), Selector::None, Format::S)
        .with_fregs(0b0001),
    fused("fmadd.d", OP_FMADD),
    fused("fmsub.d", OP_FMSUB),
    fused("fnmsub.d", OP_FNMSUB),
    fused("fnmadd.d", OP_FNMADD),
    op("fadd.d", None, Selector::Funct7(funct7::FADD), Format::R).with_fregs(0b0111),
    op("fsub.d", None, Selector::Funct7(funct7::FSUB), Format::R).with_fregs(0b0111),
    op("fmul.d", None, Selector::Funct7(funct7::FMUL), Format::R).with_fregs(0b0111),
    op("fdiv.d", None, Selector::Funct7(funct7::FDIV), Format::R).with_fregs(0b0111),
    op("fsqrt.d", None, Selector::Funct7Rs2(funct7::FSQRT, 0), Format::RUnary).with_fregs(0b0011),
    op("fsgnj.d", Some(funct3::FSGNJ), Selector::Funct7(funct7::FSGNJ), Format::R)
        .with_fregs(0b0111),
    op("fsgnjn.d", Some(funct3::FSGNJN), Selector::Funct7(funct7::FSGNJ), Format::R)
        .with_fregs(0b0111),
    op("fsgnjx.d", Some(funct3::FSGNJX), Selector::Funct7(funct7::FSGNJ), Format::R)
        .with_fregs(0b0111),
    op("fmin.d", Some(funct3::FMIN), Selector::Funct7(funct7::FMIN_MAX), Format::R)
        .with_fregs(0b0111),
    op("fmax.d", Some(funct3::FMAX), Selector::Funct7(funct7::FMIN_MAX), Format::R)
        .with_fregs(0b0111),
    op("fcvt.s.d", None, Selector::Funct7Rs2(funct7::FCVT_S_D, 1), Format::RUnary)
        .with_fregs(0b0011),
    op("fcvt.d.s", None, Selector::Funct7Rs2(funct7::FCVT_D_S, 0), Format::RUnary)
        .with_fregs(0b0011),
    op("feq.d", Some(funct3::FEQ), Selector::Funct7(funct7::FCMP), Format::R).with_fregs(0b0110),
    op("flt.d", Some(funct3::FLT), Selector::Funct7(funct7::FCMP), Format::R).with_fregs(0b0110),
    op("fle.d", Some(funct3::FLE), Selector::Funct7(funct7::FCMP), Format::R).with_fregs(0b0110),
    op("fclass.d", Some(funct3::FCLASS), Selector::Funct7Rs2(funct7::FCLASS, 0), Format::RUnary)
        .with_fregs(0b0010),
    op("fcvt.w.d", None, Selector::Funct7Rs2(funct7::FCVT_W, RS2_SIGNED), Format::RUnary)
        .with_fregs(0b0010),
    op("fcvt.wu.d", None, Selector::Funct7Rs2(funct7::FCVT_W, RS2_UNSIGNED), Format::RUnary)
        .with_fregs(0b0010),
    op("fcvt.d.w", None, Selector::Funct7Rs2(funct7::FCVT_FROM_W, RS2_SIGNED), Format::RUnary)
        .with_fregs(0b0001),
    op("fcvt.d.wu", None, Selector::Funct7Rs2(funct7::FCVT_FROM_W, RS2_UNSIGNED), Format::RUnary)
        .with_fregs(0b0001),
];

/// Double-precision handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rv32d;

impl InstructionSet for Rv32d {
    fn name(&self) -> &'static str {
        "rv32d"
    }

    fn load(&self) -> Vec<(String, Handler)> {
        instruction_table![
            fld, fsd, fmadd_d, fmsub_d, fnmsub_d, fnmadd_d, fadd_d, fsub_d, fmul_d, fdiv_d,
            fsqrt_d, fsgnj_d, fsgnjn_d, fsgnjx_d, fmin_d, fmax_d, fcvt_s_d, fcvt_d_s, feq_d,
            flt_d, fle_d, fclass_d, fcvt_w_d, fcvt_wu_d, fcvt_d_w, fcvt_d_wu,
        ]
    }
}

fn require_double(cpu: &Cpu, inst: &Instruction) -> Result<(), ExecError> {
    if cpu.regs.flen() == FloatWidth::F32 {
        return Err(cpu.illegal(inst));
    }
    Ok(())
}

fn fld(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::load::<f64>(cpu, inst)
}

fn fsd(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::store::<f64>(cpu, inst)
}

fn fmadd_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::fused::<f64>(cpu, inst, Fused::MulAdd)
}

fn fmsub_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::fused::<f64>(cpu, inst, Fused::MulSub)
}

fn fnmsub_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::fused::<f64>(cpu, inst, Fused::NegMulSub)
}

fn fnmadd_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::fused::<f64>(cpu, inst, Fused::NegMulAdd)
}

fn fadd_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::binary::<f64>(cpu, inst, |a, b| a + b)
}

fn fsub_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::binary::<f64>(cpu, inst, |a, b| a - b)
}

fn fmul_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::binary::<f64>(cpu, inst, |a, b| a * b)
}

fn fdiv_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::divide::<f64>(cpu, inst)
}

fn fsqrt_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::sqrt::<f64>(cpu, inst)
}

fn fsgnj_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::sign_inject::<f64>(cpu, inst, SignSource::Copy)
}

fn fsgnjn_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::sign_inject::<f64>(cpu, inst, SignSource::Negate)
}

fn fsgnjx_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::sign_inject::<f64>(cpu, inst, SignSource::Xor)
}

fn fmin_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::min_max::<f64>(cpu, inst, false)
}

fn fmax_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::min_max::<f64>(cpu, inst, true)
}

fn fcvt_s_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::convert::<f64, f32>(cpu, inst)
}

fn fcvt_d_s(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::convert::<f32, f64>(cpu, inst)
}

fn feq_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::compare::<f64>(cpu, inst, Compare::Eq)
}

fn flt_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::compare::<f64>(cpu, inst, Compare::Lt)
}

fn fle_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::compare::<f64>(cpu, inst, Compare::Le)
}

fn fclass_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::classify::<f64>(cpu, inst)
}

fn fcvt_w_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::to_integer::<f64>(cpu, inst, true)
}

fn fcvt_wu_d(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::to_integer::<f64>(cpu, inst, false)
}

fn fcvt_d_w(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::from_integer::<f64>(cpu, inst, true)
}

fn fcvt_d_wu(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    require_double(cpu, inst)?;
    ops::from_integer::<f64>(cpu, inst, false)
}
