//! Control transfer lowering: returns, jumps and block terminators

use super::load::load_var;
use crate::error::CodegenError;
use crate::slots::StackSlots;
use ifcc_codegen::{AluOp, AsmInst, Cond, Operand, Reg};
use ifcc_common::{BlockId, Width};
use ifcc_ir::{Terminator, EPILOGUE_BLOCK};
use log::trace;

/// `ret value`: result into `%rax`, then leave through the epilogue
pub fn lower_return(
    slots: &StackSlots,
    value: &str,
    epilogue_label: &str,
) -> Result<Vec<AsmInst>, CodegenError> {
    let mut insts = load_var(slots, value, Reg::Rax, Width::Quad)?;
    insts.push(AsmInst::Jmp(epilogue_label.to_string()));
    Ok(insts)
}

pub fn lower_jump(label: &str) -> Vec<AsmInst> {
    vec![AsmInst::Jmp(label.to_string())]
}

/// Lower a block's terminator.
///
/// `labels` maps block ids to emitted labels and `next` is the block laid
/// out immediately after this one; jumps to it are left out.
pub fn lower_terminator(
    slots: &StackSlots,
    terminator: &Terminator,
    labels: &[String],
    next: Option<BlockId>,
) -> Result<Vec<AsmInst>, CodegenError> {
    let label = |id: BlockId| labels.get(id).cloned().ok_or(CodegenError::UnknownBlock(id));
    let jump_unless_next = |id: BlockId| -> Result<Vec<AsmInst>, CodegenError> {
        if next == Some(id) {
            trace!("  fall into block {id}");
            Ok(vec![])
        } else {
            Ok(vec![AsmInst::Jmp(label(id)?)])
        }
    };

    match terminator {
        Terminator::FallThrough => jump_unless_next(EPILOGUE_BLOCK),
        Terminator::Jump(target) => jump_unless_next(*target),
        Terminator::Branch { test, on_true, on_false } => {
            let (slot, width) = slots.lookup(test)?;
            let mut insts = vec![
                AsmInst::Alu { op: AluOp::Cmp, width, src: Operand::Imm(0), dst: slot },
                AsmInst::Jcc(Cond::E, label(*on_false)?),
            ];
            insts.extend(jump_unless_next(*on_true)?);
            Ok(insts)
        }
    }
}
