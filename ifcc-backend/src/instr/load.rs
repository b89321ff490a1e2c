//! Loads, stores and operand resolution
//!
//! Values narrower than the operation width are sign-extended on load;
//! wider ones are read through their low bytes. Stores write exactly the
//! destination's declared width, which truncates.

use crate::error::CodegenError;
use crate::slots::StackSlots;
use ifcc_codegen::{AsmInst, Operand, Reg};
use ifcc_common::Width;
use ifcc_ir::Operand as IrOperand;
use log::trace;

/// Move an immediate into `reg`, narrowed to `width`
pub fn load_imm(value: i64, reg: Reg, width: Width) -> Vec<AsmInst> {
    let value = width.truncate(value);
    if width == Width::Quad && !Width::fits_imm32(value) {
        vec![AsmInst::MovAbs { value, dst: reg }]
    } else {
        vec![AsmInst::Mov {
            width,
            src: Operand::Imm(value),
            dst: Operand::Reg(reg, width),
        }]
    }
}

/// Read symbol `name` into `reg` at `width`
pub fn load_var(
    slots: &StackSlots,
    name: &str,
    reg: Reg,
    width: Width,
) -> Result<Vec<AsmInst>, CodegenError> {
    let (slot, declared) = slots.lookup(name)?;
    trace!("  load {name} ({declared}) into {} at {width}", reg.name(width));

    let inst = if declared < width {
        AsmInst::Movsx { from: declared, to: width, src: slot, dst: reg }
    } else {
        AsmInst::Mov { width, src: slot, dst: Operand::Reg(reg, width) }
    };
    Ok(vec![inst])
}

pub fn load_operand(
    slots: &StackSlots,
    operand: &IrOperand,
    reg: Reg,
    width: Width,
) -> Result<Vec<AsmInst>, CodegenError> {
    match operand {
        IrOperand::Imm(value) => Ok(load_imm(*value, reg, width)),
        IrOperand::Var(name) => load_var(slots, name, reg, width),
    }
}

/// Pick the source form of a two-operand instruction at `width`.
///
/// Immediates are used directly when they fit (and `allow_imm` is set),
/// slots when their width matches; anything else goes through `%rcx`.
pub fn resolve_source(
    slots: &StackSlots,
    operand: &IrOperand,
    width: Width,
    allow_imm: bool,
) -> Result<(Vec<AsmInst>, Operand), CodegenError> {
    match operand {
        IrOperand::Imm(value) => {
            let value = width.truncate(*value);
            if allow_imm && Width::fits_imm32(value) {
                Ok((vec![], Operand::Imm(value)))
            } else {
                Ok((load_imm(value, Reg::Rcx, width), Operand::Reg(Reg::Rcx, width)))
            }
        }
        IrOperand::Var(name) => {
            let (slot, declared) = slots.lookup(name)?;
            if declared == width {
                Ok((vec![], slot))
            } else {
                Ok((load_var(slots, name, Reg::Rcx, width)?, Operand::Reg(Reg::Rcx, width)))
            }
        }
    }
}

/// Write the low bytes of `reg` into `name`'s slot
pub fn store(slots: &StackSlots, name: &str, reg: Reg) -> Result<Vec<AsmInst>, CodegenError> {
    let (slot, width) = slots.lookup(name)?;
    Ok(vec![AsmInst::Mov { width, src: Operand::Reg(reg, width), dst: slot }])
}

/// `ldconst dest, $value`
pub fn lower_load_const(slots: &StackSlots, dest: &str, value: i64) -> Result<Vec<AsmInst>, CodegenError> {
    let (slot, width) = slots.lookup(dest)?;
    let value = width.truncate(value);

    if Width::fits_imm32(value) {
        return Ok(vec![AsmInst::Mov { width, src: Operand::Imm(value), dst: slot }]);
    }

    // Only quad slots can hold values outside the imm32 range
    let mut insts = load_imm(value, Reg::Rax, width);
    insts.extend(store(slots, dest, Reg::Rax)?);
    Ok(insts)
}

/// `copy dest, src`
pub fn lower_copy(slots: &StackSlots, dest: &str, src: &str) -> Result<Vec<AsmInst>, CodegenError> {
    let width = slots.width_of(dest)?.promoted();
    let mut insts = load_var(slots, src, Reg::Rax, width)?;
    insts.extend(store(slots, dest, Reg::Rax)?);
    Ok(insts)
}
