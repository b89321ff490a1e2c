//! Loop control: break and continue

use super::IrGenerator;
use crate::instructions::Instruction;
use ifcc_common::{BlockId, CompilerError, SourceLocation};

fn jump_to(gen: &mut IrGenerator, target: BlockId) -> Result<(), CompilerError> {
    let label = gen
        .cfg
        .label_of(target)
        .ok_or_else(|| CompilerError::InternalError {
            message: format!("loop target block {target} does not exist"),
        })?
        .to_string();
    gen.cfg.add_instruction(Instruction::Jump { label });
    Ok(())
}

pub fn lower_break(gen: &mut IrGenerator, location: SourceLocation) -> Result<(), CompilerError> {
    match gen.break_targets.last() {
        Some(&target) => jump_to(gen, target),
        None => Err(CompilerError::LoopControlOutsideLoop {
            keyword: "break".to_string(),
            location,
        }),
    }
}

pub fn lower_continue(gen: &mut IrGenerator, location: SourceLocation) -> Result<(), CompilerError> {
    match gen.continue_targets.last() {
        Some(&target) => jump_to(gen, target),
        None => Err(CompilerError::LoopControlOutsideLoop {
            keyword: "continue".to_string(),
            location,
        }),
    }
}
