//! Syntax tree to IR lowering
//!
//! `IrGenerator` walks the tree through the [`Visitor`] contract: expressions
//! become [`ExprNode`] trees, statements lower those trees into the current
//! block and grow the CFG for conditionals and loops.

pub mod statements;
pub mod control_flow;
pub mod jumps;

use crate::cfg::Cfg;
use crate::expr::ExprNode;
use crate::instructions::Instruction;
use ifcc_common::{BlockId, CompilerError, Diagnostic, SourceLocation, Width};
use ifcc_frontend::ast::{
    AssignOp, BinaryOp, Declaration, Expression, Identifier, Program, Statement, UnaryOp, Visitor,
};
use log::debug;

/// A lowered function and the warnings raised while lowering it
#[derive(Debug, Clone)]
pub struct LoweredFunction {
    pub cfg: Cfg,
    pub warnings: Vec<Diagnostic>,
}

/// Lower the program's single function
pub fn lower_program(program: &Program) -> Result<LoweredFunction, CompilerError> {
    let function = &program.function;
    let mut gen = IrGenerator::new(&function.name, function.return_type.width());
    gen.visit_program(program)?;

    let warnings = gen.cfg.symbols.check_unused();
    debug!(
        "lowered '{}': {} blocks, {} symbols, {} warnings",
        function.name,
        gen.cfg.blocks.len(),
        gen.cfg.symbols.len(),
        warnings.len()
    );

    Ok(LoweredFunction { cfg: gen.into_cfg(), warnings })
}

pub struct IrGenerator {
    pub(crate) cfg: Cfg,
    pub(crate) break_targets: Vec<BlockId>,
    pub(crate) continue_targets: Vec<BlockId>,
    pub(crate) return_width: Width,
}

impl IrGenerator {
    pub fn new(function_name: &str, return_width: Width) -> Self {
        Self {
            cfg: Cfg::new(function_name),
            break_targets: Vec::new(),
            continue_targets: Vec::new(),
            return_width,
        }
    }

    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }

    pub fn into_cfg(self) -> Cfg {
        self.cfg
    }

    /// Lower a tree into a fresh temporary of its own width
    pub(crate) fn lower_to_temp(&mut self, node: ExprNode) -> Result<String, CompilerError> {
        let temp = self.cfg.new_temp(node.width())?;
        node.lower(&mut self.cfg, &temp)?;
        Ok(temp)
    }

    /// Evaluate `value` and store it into the declared variable `name`
    pub(crate) fn store(&mut self, name: &str, value: ExprNode) -> Result<(), CompilerError> {
        let temp = self.lower_to_temp(value)?;
        self.cfg.add_instruction(Instruction::Copy { dest: name.to_string(), src: temp });
        self.cfg.symbols.mark_initialized(name)
    }

    /// Resolve a read of `name`, marking it used
    pub(crate) fn read_variable(&mut self, name: &str, location: SourceLocation) -> Result<ExprNode, CompilerError> {
        self.cfg
            .symbols
            .offset_of(name, false)
            .map_err(|e| e.at(location))?;
        self.cfg.symbols.mark_used(name)?;
        let width = self.cfg.symbols.width_of(name)?;
        Ok(ExprNode::variable(name, width))
    }
}

impl Visitor for IrGenerator {
    type Value = ExprNode;
    type Error = CompilerError;

    fn visit_program(&mut self, program: &Program) -> Result<(), CompilerError> {
        let function = &program.function;
        debug!("lowering function '{}'", function.name);
        self.visit_block(&function.body)?;

        if !function.ends_with_return() {
            statements::lower_implicit_return(self)?;
        }
        Ok(())
    }

    fn visit_declaration(&mut self, declaration: &Declaration, _: SourceLocation) -> Result<(), CompilerError> {
        statements::lower_declaration(self, declaration)
    }

    fn visit_assignment(
        &mut self,
        target: &Identifier,
        op: AssignOp,
        value: &Expression,
        _: SourceLocation,
    ) -> Result<(), CompilerError> {
        statements::lower_assignment(self, target, op, value)
    }

    fn visit_return(&mut self, value: &Expression, _: SourceLocation) -> Result<(), CompilerError> {
        statements::lower_return(self, value)
    }

    fn visit_if(
        &mut self,
        condition: &Expression,
        then_stmt: &Statement,
        else_stmt: Option<&Statement>,
        _: SourceLocation,
    ) -> Result<(), CompilerError> {
        control_flow::lower_if(self, condition, then_stmt, else_stmt)
    }

    fn visit_while(&mut self, condition: &Expression, body: &Statement, _: SourceLocation) -> Result<(), CompilerError> {
        control_flow::lower_while(self, condition, body)
    }

    fn visit_break(&mut self, location: SourceLocation) -> Result<(), CompilerError> {
        jumps::lower_break(self, location)
    }

    fn visit_continue(&mut self, location: SourceLocation) -> Result<(), CompilerError> {
        jumps::lower_continue(self, location)
    }

    fn visit_int_literal(&mut self, value: i64, _: SourceLocation) -> Result<ExprNode, CompilerError> {
        Ok(ExprNode::constant(value))
    }

    fn visit_identifier(&mut self, name: &str, location: SourceLocation) -> Result<ExprNode, CompilerError> {
        self.read_variable(name, location)
    }

    fn visit_unary(&mut self, op: UnaryOp, operand: &Expression, _: SourceLocation) -> Result<ExprNode, CompilerError> {
        let operand = self.visit_expression(operand)?;
        Ok(ExprNode::unary(op, operand))
    }

    fn visit_binary(
        &mut self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
        _: SourceLocation,
    ) -> Result<ExprNode, CompilerError> {
        let left = self.visit_expression(left)?;
        let right = self.visit_expression(right)?;
        Ok(ExprNode::binary(op, left, right))
    }
}

#[cfg(test)]
mod tests;
