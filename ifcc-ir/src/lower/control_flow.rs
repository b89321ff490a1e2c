//! Conditionals and loops
//!
//! Both constructs split the current block: the current block jumps to a new
//! condition block and the block that resumes afterwards (join/next) takes
//! over the current block's old terminator.

use super::IrGenerator;
use crate::blocks::Terminator;
use crate::cfg::EPILOGUE_BLOCK;
use ifcc_common::{BlockId, CompilerError};
use ifcc_frontend::ast::{Expression, Statement, Visitor};

/// Detach the current block's terminator, point it at a fresh condition
/// block and make that block current
fn open_condition_block(gen: &mut IrGenerator) -> (BlockId, Terminator) {
    let before = gen.cfg.current_block();
    let inherited = gen
        .cfg
        .terminator(before)
        .cloned()
        .unwrap_or(Terminator::Jump(EPILOGUE_BLOCK));

    let condition_block = gen.cfg.new_block(Terminator::Jump(EPILOGUE_BLOCK));
    gen.cfg.set_terminator(before, Terminator::Jump(condition_block));
    gen.cfg.set_current_block(condition_block);
    (condition_block, inherited)
}

/// Evaluate a condition into its test variable in the current block
fn lower_condition(gen: &mut IrGenerator, condition: &Expression) -> Result<String, CompilerError> {
    let node = gen.visit_expression(condition)?;
    gen.lower_to_temp(node)
}

pub fn lower_if(
    gen: &mut IrGenerator,
    condition: &Expression,
    then_stmt: &Statement,
    else_stmt: Option<&Statement>,
) -> Result<(), CompilerError> {
    let (condition_block, inherited) = open_condition_block(gen);
    let test = lower_condition(gen, condition)?;

    let then_block = gen.cfg.new_block(Terminator::Jump(EPILOGUE_BLOCK));
    let else_block = else_stmt.map(|_| gen.cfg.new_block(Terminator::Jump(EPILOGUE_BLOCK)));
    let join_block = gen.cfg.new_block(inherited);

    gen.cfg.set_terminator(then_block, Terminator::Jump(join_block));
    if let Some(else_block) = else_block {
        gen.cfg.set_terminator(else_block, Terminator::Jump(join_block));
    }
    gen.cfg.set_terminator(
        condition_block,
        Terminator::Branch {
            test,
            on_true: then_block,
            on_false: else_block.unwrap_or(join_block),
        },
    );

    gen.cfg.set_current_block(then_block);
    gen.visit_statement(then_stmt)?;

    if let (Some(else_block), Some(else_stmt)) = (else_block, else_stmt) {
        gen.cfg.set_current_block(else_block);
        gen.visit_statement(else_stmt)?;
    }

    gen.cfg.set_current_block(join_block);
    Ok(())
}

pub fn lower_while(gen: &mut IrGenerator, condition: &Expression, body: &Statement) -> Result<(), CompilerError> {
    let (condition_block, inherited) = open_condition_block(gen);
    let test = lower_condition(gen, condition)?;

    let body_block = gen.cfg.new_block(Terminator::Jump(condition_block));
    let next_block = gen.cfg.new_block(inherited);
    gen.cfg.set_terminator(
        condition_block,
        Terminator::Branch {
            test,
            on_true: body_block,
            on_false: next_block,
        },
    );

    gen.break_targets.push(next_block);
    gen.continue_targets.push(condition_block);

    gen.cfg.set_current_block(body_block);
    let result = gen.visit_statement(body);

    gen.break_targets.pop();
    gen.continue_targets.pop();
    result?;

    gen.cfg.set_current_block(next_block);
    Ok(())
}
