//! Three-address arithmetic, bitwise, shift and comparison lowering
//!
//! The operation runs at the destination's promoted width: the left operand
//! is loaded into the accumulator, the right operand is resolved to an
//! immediate, a slot or `%rcx`, and the accumulator is stored back.

use super::load::{load_operand, resolve_source, store};
use crate::error::CodegenError;
use crate::slots::StackSlots;
use ifcc_codegen::{AluOp, AsmInst, Cond, Operand, Reg, ShiftOp};
use ifcc_ir::{BinaryOpcode, Operand as IrOperand};
use log::trace;

pub fn lower_binary(
    slots: &StackSlots,
    op: BinaryOpcode,
    dest: &str,
    lhs: &IrOperand,
    rhs: &IrOperand,
) -> Result<Vec<AsmInst>, CodegenError> {
    let width = slots.width_of(dest)?.promoted();
    let acc = Operand::Reg(Reg::Rax, width);
    trace!("  {op} at {width}");

    let mut insts = load_operand(slots, lhs, Reg::Rax, width)?;

    match op {
        BinaryOpcode::Add
        | BinaryOpcode::Sub
        | BinaryOpcode::Mul
        | BinaryOpcode::BitAnd
        | BinaryOpcode::BitOr
        | BinaryOpcode::BitXor => {
            let alu = match op {
                BinaryOpcode::Add => AluOp::Add,
                BinaryOpcode::Sub => AluOp::Sub,
                BinaryOpcode::Mul => AluOp::Imul,
                BinaryOpcode::BitAnd => AluOp::And,
                BinaryOpcode::BitOr => AluOp::Or,
                _ => AluOp::Xor,
            };
            let (setup, src) = resolve_source(slots, rhs, width, true)?;
            insts.extend(setup);
            insts.push(AsmInst::Alu { op: alu, width, src, dst: acc });
        }

        BinaryOpcode::Shl | BinaryOpcode::Shr => {
            // The count register is masked by the hardware to width - 1 bits
            insts.extend(load_operand(slots, rhs, Reg::Rcx, width)?);
            let shift = if op == BinaryOpcode::Shl { ShiftOp::Shl } else { ShiftOp::Shr };
            insts.push(AsmInst::Shift { op: shift, width, dst: acc });
        }

        BinaryOpcode::Div | BinaryOpcode::Mod => {
            // idiv has no immediate form
            let (setup, src) = resolve_source(slots, rhs, width, false)?;
            insts.extend(setup);
            insts.push(AsmInst::SignExtendAcc(width));
            insts.push(AsmInst::Idiv { width, src });
            if op == BinaryOpcode::Mod {
                insts.push(AsmInst::Mov { width, src: Operand::Reg(Reg::Rdx, width), dst: acc });
            }
        }

        BinaryOpcode::Eq
        | BinaryOpcode::Neq
        | BinaryOpcode::Lt
        | BinaryOpcode::Leq
        | BinaryOpcode::Gt
        | BinaryOpcode::Geq => {
            let cond = match op {
                BinaryOpcode::Eq => Cond::E,
                BinaryOpcode::Neq => Cond::Ne,
                BinaryOpcode::Lt => Cond::L,
                BinaryOpcode::Leq => Cond::Le,
                BinaryOpcode::Gt => Cond::G,
                _ => Cond::Ge,
            };
            let (setup, src) = resolve_source(slots, rhs, width, true)?;
            insts.extend(setup);
            insts.push(AsmInst::Alu { op: AluOp::Cmp, width, src, dst: acc });
            insts.push(AsmInst::Set { cond, dst: Reg::Rax });
            insts.push(AsmInst::Movzb { src: Reg::Rax, dst: Reg::Rax });
        }
    }

    insts.extend(store(slots, dest, Reg::Rax)?);
    Ok(insts)
}
