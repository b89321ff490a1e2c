//! Expression trees with constant folding
//!
//! Nodes are built bottom-up while the syntax tree is traversed. Every
//! `unary`/`binary` construction folds literal-only subtrees immediately, so
//! by the time a tree is lowered the only constants left are leaves (or
//! divisions that would trap and are kept for run time).

use crate::cfg::Cfg;
use crate::instructions::{BinaryOpcode, Instruction, Operand, UnaryOpcode};
use ifcc_common::{CompilerError, Width};
use ifcc_frontend::{BinaryOp, UnaryOp};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Constant,
    Variable,
    Composite,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Constant {
        value: i64,
        width: Width,
    },
    Variable {
        name: String,
        width: Width,
    },
    Unary {
        op: UnaryOp,
        operand: Box<ExprNode>,
        width: Width,
    },
    Binary {
        op: BinaryOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
        width: Width,
    },
}

impl ExprNode {
    /// Literal with the default 8-byte width
    pub fn constant(value: i64) -> Self {
        ExprNode::Constant { value, width: Width::Quad }
    }

    pub fn variable(name: impl Into<String>, width: Width) -> Self {
        ExprNode::Variable { name: name.into(), width }
    }

    /// Build `op operand`, folding it if the operand is constant
    pub fn unary(op: UnaryOp, operand: ExprNode) -> Self {
        let width = composite_width([&operand]);
        ExprNode::Unary { op, operand: Box::new(operand), width }.fold()
    }

    /// Build `left op right`, folding it if both sides are constant
    pub fn binary(op: BinaryOp, left: ExprNode, right: ExprNode) -> Self {
        let width = composite_width([&left, &right]);
        ExprNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            width,
        }
        .fold()
    }

    pub fn width(&self) -> Width {
        match self {
            ExprNode::Constant { width, .. }
            | ExprNode::Variable { width, .. }
            | ExprNode::Unary { width, .. }
            | ExprNode::Binary { width, .. } => *width,
        }
    }

    pub fn classify(&self) -> NodeClass {
        match self {
            ExprNode::Constant { .. } => NodeClass::Constant,
            ExprNode::Variable { .. } => NodeClass::Variable,
            ExprNode::Unary { operand, .. } => {
                if operand.classify() == NodeClass::Constant {
                    NodeClass::Constant
                } else {
                    NodeClass::Composite
                }
            }
            ExprNode::Binary { left, right, .. } => {
                if left.classify() == NodeClass::Constant && right.classify() == NodeClass::Constant {
                    NodeClass::Constant
                } else {
                    NodeClass::Composite
                }
            }
        }
    }

    /// Value of a constant tree, computed at each node's width.
    ///
    /// `None` for trees that reference variables and for operations that
    /// trap at run time.
    pub fn evaluate(&self) -> Option<i64> {
        match self {
            ExprNode::Constant { value, .. } => Some(*value),
            ExprNode::Variable { .. } => None,
            ExprNode::Unary { op, operand, width } => {
                let value = operand.evaluate()?;
                Some(match UnaryOpcode::from_ast(*op) {
                    Some(opcode) => opcode.apply(value, *width),
                    None => width.truncate(value),
                })
            }
            ExprNode::Binary { op, left, right, width } => {
                let lhs = left.evaluate()?;
                let rhs = right.evaluate()?;
                match BinaryOpcode::from_ast(*op) {
                    Some(opcode) => opcode.apply(lhs, rhs, *width),
                    None => {
                        let (a, b) = (width.truncate(lhs) != 0, width.truncate(rhs) != 0);
                        let result = match op {
                            BinaryOp::LogicalAnd => a && b,
                            _ => a || b,
                        };
                        Some(result as i64)
                    }
                }
            }
        }
    }

    /// Collapse this node to a single constant when possible
    pub fn fold(self) -> Self {
        if matches!(self, ExprNode::Constant { .. }) || self.classify() != NodeClass::Constant {
            return self;
        }
        match self.evaluate() {
            Some(value) => {
                trace!("folded constant expression to {value}");
                ExprNode::constant(value)
            }
            None => self,
        }
    }

    /// Emit instructions into the current block of `cfg` so that `dest`
    /// holds this node's value.
    ///
    /// A composite value headed for a destination narrower than the node is
    /// computed in a temporary of the node's width and then copied.
    pub fn lower(self, cfg: &mut Cfg, dest: &str) -> Result<(), CompilerError> {
        match self {
            ExprNode::Constant { value, .. } => {
                cfg.add_instruction(Instruction::LoadConst { dest: dest.to_string(), value });
                Ok(())
            }
            ExprNode::Variable { name, .. } => {
                cfg.add_instruction(Instruction::Copy { dest: dest.to_string(), src: name });
                Ok(())
            }
            composite => {
                if cfg.symbols.width_of(dest)? < composite.width() {
                    let temp = cfg.new_temp(composite.width())?;
                    composite.lower_composite(cfg, &temp)?;
                    cfg.add_instruction(Instruction::Copy { dest: dest.to_string(), src: temp });
                    Ok(())
                } else {
                    composite.lower_composite(cfg, dest)
                }
            }
        }
    }

    /// Resolve this node to a flat operand, materialising composites
    pub fn into_operand(self, cfg: &mut Cfg) -> Result<Operand, CompilerError> {
        match self {
            ExprNode::Constant { value, .. } => Ok(Operand::Imm(value)),
            ExprNode::Variable { name, .. } => Ok(Operand::Var(name)),
            composite => {
                let temp = cfg.new_temp(composite.width())?;
                composite.lower(cfg, &temp)?;
                Ok(Operand::Var(temp))
            }
        }
    }

    fn lower_composite(self, cfg: &mut Cfg, dest: &str) -> Result<(), CompilerError> {
        match self {
            ExprNode::Unary { op, operand, .. } => {
                (*operand).lower(cfg, dest)?;
                if let Some(opcode) = UnaryOpcode::from_ast(op) {
                    cfg.add_instruction(Instruction::Unary { op: opcode, dest: dest.to_string() });
                }
                Ok(())
            }
            ExprNode::Binary { op, left, right, width } => {
                let lhs = (*left).into_operand(cfg)?;
                let rhs = (*right).into_operand(cfg)?;
                match BinaryOpcode::from_ast(op) {
                    Some(opcode) => {
                        cfg.add_instruction(Instruction::Binary {
                            op: opcode,
                            dest: dest.to_string(),
                            lhs,
                            rhs,
                        });
                        Ok(())
                    }
                    None => lower_logical(cfg, op, lhs, rhs, width, dest),
                }
            }
            leaf => leaf.lower(cfg, dest),
        }
    }
}

/// Width of a composite node: the widest non-constant child, at least 4
/// bytes. A literal outside the 32-bit range widens the node to 8 bytes;
/// other literals do not count. Literal-only nodes keep the 8-byte default.
fn composite_width<'a>(children: impl IntoIterator<Item = &'a ExprNode>) -> Width {
    let widest = children
        .into_iter()
        .filter_map(|child| match child {
            ExprNode::Constant { value, .. } if !Width::fits_imm32(*value) => Some(Width::Quad),
            _ if child.classify() == NodeClass::Constant => None,
            _ => Some(child.width()),
        })
        .max();
    match widest {
        Some(width) => width.promoted(),
        None => Width::Quad,
    }
}

/// `a && b` / `a || b` without short circuit: reduce both sides to 0/1,
/// add, and compare the sum against 2 (and) or 1 (or). The operand tests
/// run at the node's width so wide values are not narrowed first.
fn lower_logical(
    cfg: &mut Cfg,
    op: BinaryOp,
    lhs: Operand,
    rhs: Operand,
    width: Width,
    dest: &str,
) -> Result<(), CompilerError> {
    let threshold = if op == BinaryOp::LogicalAnd { 2 } else { 1 };

    let left_bool = cfg.new_temp(width)?;
    cfg.add_instruction(Instruction::Binary {
        op: BinaryOpcode::Neq,
        dest: left_bool.clone(),
        lhs,
        rhs: Operand::Imm(0),
    });

    let right_bool = cfg.new_temp(width)?;
    cfg.add_instruction(Instruction::Binary {
        op: BinaryOpcode::Neq,
        dest: right_bool.clone(),
        lhs: rhs,
        rhs: Operand::Imm(0),
    });

    let sum = cfg.new_temp(Width::Long)?;
    cfg.add_instruction(Instruction::Binary {
        op: BinaryOpcode::Add,
        dest: sum.clone(),
        lhs: Operand::Var(left_bool),
        rhs: Operand::Var(right_bool),
    });

    cfg.add_instruction(Instruction::Binary {
        op: BinaryOpcode::Geq,
        dest: dest.to_string(),
        lhs: Operand::Var(sum),
        rhs: Operand::Imm(threshold),
    });
    Ok(())
}
