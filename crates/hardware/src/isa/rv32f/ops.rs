//! Handler bodies shared by the single- and double-precision instruction sets.
//!
//! Structured instructions may append a rounding-mode name after their register
//! operands; `RM_*` give its position per operand layout.

use super::flags::FpFlags;
use super::float::Float;
use super::rounding::{self, RoundingMode};
use crate::common::error::ExecError;
use crate::core::Cpu;
use crate::isa::instruction::Instruction;

/// Rounding-mode operand index for `[rd, rs1, rs2]`.
pub const RM_BINARY: usize = 3;
/// Rounding-mode operand index for `[rd, rs1]`.
pub const RM_UNARY: usize = 2;
/// Rounding-mode operand index for `[rd, rs1, rs2, rs3]`.
pub const RM_FUSED: usize = 4;

/// Fused multiply-add variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fused {
    /// `rs1 * rs2 + rs3`
    MulAdd,
    /// `rs1 * rs2 - rs3`
    MulSub,
    /// `-(rs1 * rs2) + rs3`
    NegMulSub,
    /// `-(rs1 * rs2) - rs3`
    NegMulAdd,
}

/// Comparison predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compare {
    /// `feq`: quiet, only signaling NaNs are invalid.
    Eq,
    /// `flt`: signaling, any NaN is invalid.
    Lt,
    /// `fle`: signaling, any NaN is invalid.
    Le,
}

/// Sign-injection variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignSource {
    /// Sign of `rs2`.
    Copy,
    /// Inverted sign of `rs2`.
    Negate,
    /// Sign of `rs1` XOR sign of `rs2`.
    Xor,
}

/// Resolves the rounding mode of `inst`, reading `frm` when it is dynamic.
pub fn rounding_mode(
    cpu: &Cpu,
    inst: &Instruction,
    index: usize,
) -> Result<RoundingMode, ExecError> {
    let field = inst.rounding_mode(index)?;
    RoundingMode::resolve(field, cpu.dynamic_rounding_mode()).ok_or_else(|| cpu.illegal(inst))
}

fn input_flags<F: Float>(operands: &[F]) -> FpFlags {
    if operands.iter().any(|v| v.is_signaling()) {
        FpFlags::NV
    } else {
        FpFlags::NONE
    }
}

/// Flags of an arithmetic result computed in round-to-nearest-even.
fn result_flags<F: Float>(operands: &[F], result: F) -> FpFlags {
    let mut flags = input_flags(operands);
    let any_nan = operands.iter().any(|v| v.is_nan());
    if result.is_nan() && !any_nan {
        flags |= FpFlags::NV;
    }
    if result.is_infinite() && operands.iter().all(|v| !v.is_infinite() && !v.is_nan()) {
        flags |= FpFlags::OF | FpFlags::NX;
    }
    flags
}

fn finish<F: Float>(cpu: &mut Cpu, rd: usize, operands: &[F], result: F) {
    let flags = result_flags(operands, result);
    cpu.accrue_fflags(flags.bits());
    F::write(cpu, rd, result.canonical());
}

/// `fadd`, `fsub`, `fmul`.
pub fn binary<F: Float>(
    cpu: &mut Cpu,
    inst: &Instruction,
    op: impl FnOnce(F, F) -> F,
) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let a = F::read(cpu, inst.freg(1)?);
    let b = F::read(cpu, inst.freg(2)?);
    let _ = rounding_mode(cpu, inst, RM_BINARY)?;
    finish(cpu, rd, &[a, b], op(a, b));
    Ok(())
}

/// `fdiv`, which additionally reports division by zero.
pub fn divide<F: Float>(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let a = F::read(cpu, inst.freg(1)?);
    let b = F::read(cpu, inst.freg(2)?);
    let _ = rounding_mode(cpu, inst, RM_BINARY)?;
    if b == F::ZERO && a != F::ZERO && !a.is_nan() && !a.is_infinite() {
        cpu.accrue_fflags(FpFlags::DZ.bits());
        F::write(cpu, rd, a / b);
        return Ok(());
    }
    finish(cpu, rd, &[a, b], a / b);
    Ok(())
}

/// `fsqrt`.
pub fn sqrt<F: Float>(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let a = F::read(cpu, inst.freg(1)?);
    let _ = rounding_mode(cpu, inst, RM_UNARY)?;
    finish(cpu, rd, &[a], a.sqrt());
    Ok(())
}

/// The four fused multiply-add forms.
pub fn fused<F: Float>(cpu: &mut Cpu, inst: &Instruction, kind: Fused) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let a = F::read(cpu, inst.freg(1)?);
    let b = F::read(cpu, inst.freg(2)?);
    let c = F::read(cpu, inst.freg(3)?);
    let _ = rounding_mode(cpu, inst, RM_FUSED)?;
    let result = match kind {
        Fused::MulAdd => a.mul_add(b, c),
        Fused::MulSub => a.mul_add(b, -c),
        Fused::NegMulSub => (-a).mul_add(b, c),
        Fused::NegMulAdd => (-a).mul_add(b, -c),
    };
    finish(cpu, rd, &[a, b, c], result);
    Ok(())
}

/// `fsgnj`, `fsgnjn`, `fsgnjx`. Never raises flags and never canonicalises.
pub fn sign_inject<F: Float>(
    cpu: &mut Cpu,
    inst: &Instruction,
    source: SignSource,
) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let a = F::read(cpu, inst.freg(1)?);
    let b = F::read(cpu, inst.freg(2)?);
    let negative = match source {
        SignSource::Copy => b.sign(),
        SignSource::Negate => !b.sign(),
        SignSource::Xor => a.sign() ^ b.sign(),
    };
    F::write(cpu, rd, a.with_sign(negative));
    Ok(())
}

/// `fmin` / `fmax`. A single NaN operand yields the other operand; `-0 < +0`.
pub fn min_max<F: Float>(cpu: &mut Cpu, inst: &Instruction, max: bool) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let a = F::read(cpu, inst.freg(1)?);
    let b = F::read(cpu, inst.freg(2)?);
    cpu.accrue_fflags(input_flags(&[a, b]).bits());
    let result = match (a.is_nan(), b.is_nan()) {
        (true, true) => F::CANONICAL_NAN,
        (true, false) => b,
        (false, true) => a,
        (false, false) if a == b => {
            if a.sign() == max {
                b
            } else {
                a
            }
        }
        (false, false) => {
            if (a < b) ^ max {
                a
            } else {
                b
            }
        }
    };
    F::write(cpu, rd, result);
    Ok(())
}

/// `feq`, `flt`, `fle`: integer result in `rd`.
pub fn compare<F: Float>(
    cpu: &mut Cpu,
    inst: &Instruction,
    predicate: Compare,
) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let a = F::read(cpu, inst.freg(1)?);
    let b = F::read(cpu, inst.freg(2)?);
    let invalid = match predicate {
        Compare::Eq => a.is_signaling() || b.is_signaling(),
        Compare::Lt | Compare::Le => a.is_nan() || b.is_nan(),
    };
    if invalid {
        cpu.accrue_fflags(FpFlags::NV.bits());
    }
    let result = match predicate {
        Compare::Eq => a == b,
        Compare::Lt => a < b,
        Compare::Le => a <= b,
    };
    cpu.regs.write(rd, i32::from(result));
    Ok(())
}

/// `fclass`.
pub fn classify<F: Float>(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let a = F::read(cpu, inst.freg(1)?);
    cpu.regs.write_u(rd, a.classify());
    Ok(())
}

/// `fcvt.w.*` / `fcvt.wu.*`.
pub fn to_integer<F: Float>(
    cpu: &mut Cpu,
    inst: &Instruction,
    signed: bool,
) -> Result<(), ExecError> {
    let rd = inst.reg(0)?;
    let a = F::read(cpu, inst.freg(1)?);
    let mode = rounding_mode(cpu, inst, RM_UNARY)?;
    let (value, flags) = if signed {
        let (v, flags) = rounding::to_i32(a.to_f64(), mode);
        (v as u32, flags)
    } else {
        rounding::to_u32(a.to_f64(), mode)
    };
    cpu.accrue_fflags(flags.bits());
    cpu.regs.write_u(rd, value);
    Ok(())
}

/// `fcvt.*.w` / `fcvt.*.wu`.
#[allow(clippy::float_cmp)]
pub fn from_integer<F: Float>(
    cpu: &mut Cpu,
    inst: &Instruction,
    signed: bool,
) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let raw = cpu.regs.read(inst.reg(1)?);
    let _ = rounding_mode(cpu, inst, RM_UNARY)?;
    let (value, exact) = if signed {
        (F::from_i32(raw), f64::from(raw))
    } else {
        (F::from_u32(raw as u32), f64::from(raw as u32))
    };
    if value.to_f64() != exact {
        cpu.accrue_fflags(FpFlags::NX.bits());
    }
    F::write(cpu, rd, value);
    Ok(())
}

/// `fcvt.s.d` / `fcvt.d.s`: precision change through `f64`.
#[allow(clippy::float_cmp)]
pub fn convert<Src: Float, Dst: Float>(
    cpu: &mut Cpu,
    inst: &Instruction,
) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let a = Src::read(cpu, inst.freg(1)?);
    let _ = rounding_mode(cpu, inst, RM_UNARY)?;
    let result = Dst::from_f64(a.to_f64());
    let mut flags = input_flags(&[a]);
    if !a.is_nan() && result.to_f64() != a.to_f64() {
        flags |= FpFlags::NX;
        if result.is_infinite() {
            flags |= FpFlags::OF;
        }
    }
    cpu.accrue_fflags(flags.bits());
    Dst::write(cpu, rd, result.canonical());
    Ok(())
}

/// `flw` / `fld`.
pub fn load<F: Float>(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let rd = inst.freg(0)?;
    let addr = cpu
        .regs
        .read_u(inst.reg(1)?)
        .wrapping_add(inst.imm(2, &cpu.mmu)? as u32);
    let bytes = cpu.mmu.read(addr, size_of::<F>() as u32)?;
    let bits = bytes
        .iter()
        .rev()
        .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));
    F::write(cpu, rd, F::from_raw(bits));
    Ok(())
}

/// `fsw` / `fsd`.
pub fn store<F: Float>(cpu: &mut Cpu, inst: &Instruction) -> Result<(), ExecError> {
    let value = F::read(cpu, inst.freg(0)?);
    let addr = cpu
        .regs
        .read_u(inst.reg(1)?)
        .wrapping_add(inst.imm(2, &cpu.mmu)? as u32);
    let bytes = value.to_raw().to_le_bytes();
    cpu.mmu.write(addr, &bytes[..size_of::<F>()])?;
    Ok(())
}
