//! Declarations, assignments and returns

use super::IrGenerator;
use crate::expr::ExprNode;
use crate::instructions::Instruction;
use ifcc_common::CompilerError;
use ifcc_frontend::ast::{AssignOp, Declaration, Expression, Identifier, Visitor};

pub fn lower_declaration(gen: &mut IrGenerator, declaration: &Declaration) -> Result<(), CompilerError> {
    let width = declaration.decl_type.width();

    for declarator in &declaration.declarators {
        let name = &declarator.name;
        gen.cfg.symbols.declare(&name.name, width, name.location)?;

        if let Some(init) = &declarator.initializer {
            let value = gen.visit_expression(init)?;
            gen.store(&name.name, value)?;
        }
    }
    Ok(())
}

pub fn lower_assignment(
    gen: &mut IrGenerator,
    target: &Identifier,
    op: AssignOp,
    value: &Expression,
) -> Result<(), CompilerError> {
    let value = match op.binary_op() {
        None => {
            gen.cfg
                .symbols
                .offset_of(&target.name, true)
                .map_err(|e| e.at(target.location))?;
            gen.visit_expression(value)?
        }
        Some(binary_op) => {
            // The target is read (and its width fixed) before the right-hand side
            let current = gen.read_variable(&target.name, target.location)?;
            let rhs = gen.visit_expression(value)?;
            ExprNode::binary(binary_op, current, rhs)
        }
    };

    gen.store(&target.name, value)
}

pub fn lower_return(gen: &mut IrGenerator, value: &Expression) -> Result<(), CompilerError> {
    let value = gen.visit_expression(value)?;

    let name = match value {
        ExprNode::Variable { name, .. } => name,
        other => {
            let temp = gen.cfg.new_temp(gen.return_width)?;
            other.lower(&mut gen.cfg, &temp)?;
            temp
        }
    };

    gen.cfg.add_instruction(Instruction::Return { value: name });
    Ok(())
}

/// `return 0;` for a body that runs off its end
pub fn lower_implicit_return(gen: &mut IrGenerator) -> Result<(), CompilerError> {
    let temp = gen.cfg.new_temp(gen.return_width)?;
    ExprNode::constant(0).lower(&mut gen.cfg, &temp)?;
    gen.cfg.add_instruction(Instruction::Return { value: temp });
    Ok(())
}
