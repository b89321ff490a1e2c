//! In-place unary lowering: `dest = OP dest`

use super::load::{load_var, store};
use crate::error::CodegenError;
use crate::slots::StackSlots;
use ifcc_codegen::{AluOp, AsmInst, Cond, Operand, Reg, UnaryAluOp};
use ifcc_ir::UnaryOpcode;

pub fn lower_unary(slots: &StackSlots, op: UnaryOpcode, dest: &str) -> Result<Vec<AsmInst>, CodegenError> {
    let width = slots.width_of(dest)?.promoted();
    let acc = Operand::Reg(Reg::Rax, width);

    let mut insts = load_var(slots, dest, Reg::Rax, width)?;
    match op {
        UnaryOpcode::Neg => insts.push(AsmInst::Unary { op: UnaryAluOp::Neg, width, dst: acc }),
        UnaryOpcode::BitNot => insts.push(AsmInst::Unary { op: UnaryAluOp::Not, width, dst: acc }),
        UnaryOpcode::LogicalNot => {
            insts.push(AsmInst::Alu { op: AluOp::Cmp, width, src: Operand::Imm(0), dst: acc });
            insts.push(AsmInst::Set { cond: Cond::E, dst: Reg::Rax });
            insts.push(AsmInst::Movzb { src: Reg::Rax, dst: Reg::Rax });
        }
    }
    insts.extend(store(slots, dest, Reg::Rax)?);
    Ok(insts)
}
