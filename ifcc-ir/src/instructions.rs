//! IR Instructions
//! 
//! Three-address instructions with the destination first. Operands are
//! resolved to a variable or an immediate before an instruction is built.

use ifcc_common::Width;
use ifcc_frontend::{BinaryOp, UnaryOp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction operand: a symbol name or an immediate literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Var(String),
    Imm(i64),
}

impl Operand {
    pub fn var(name: impl Into<String>) -> Self {
        Operand::Var(name.into())
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            Operand::Var(name) => Some(name),
            Operand::Imm(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(name) => write!(f, "{name}"),
            Operand::Imm(value) => write!(f, "${value}"),
        }
    }
}

/// Three-operand opcodes: `dest = lhs OP rhs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOpcode {
    Add, Sub, Mul, Div, Mod,
    BitAnd, BitOr, BitXor,
    Shl, Shr,
    Eq, Neq, Lt, Leq, Gt, Geq,
}

impl BinaryOpcode {
    /// Opcode for a source operator; logical `&&`/`||` have none and are
    /// lowered to a sequence instead
    pub fn from_ast(op: BinaryOp) -> Option<Self> {
        let opcode = match op {
            BinaryOp::Add => BinaryOpcode::Add,
            BinaryOp::Sub => BinaryOpcode::Sub,
            BinaryOp::Mul => BinaryOpcode::Mul,
            BinaryOp::Div => BinaryOpcode::Div,
            BinaryOp::Mod => BinaryOpcode::Mod,
            BinaryOp::BitAnd => BinaryOpcode::BitAnd,
            BinaryOp::BitOr => BinaryOpcode::BitOr,
            BinaryOp::BitXor => BinaryOpcode::BitXor,
            BinaryOp::LeftShift => BinaryOpcode::Shl,
            BinaryOp::RightShift => BinaryOpcode::Shr,
            BinaryOp::Equal => BinaryOpcode::Eq,
            BinaryOp::NotEqual => BinaryOpcode::Neq,
            BinaryOp::Less => BinaryOpcode::Lt,
            BinaryOp::LessEqual => BinaryOpcode::Leq,
            BinaryOp::Greater => BinaryOpcode::Gt,
            BinaryOp::GreaterEqual => BinaryOpcode::Geq,
            BinaryOp::LogicalAnd | BinaryOp::LogicalOr => return None,
        };
        Some(opcode)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOpcode::Add => "add",
            BinaryOpcode::Sub => "sub",
            BinaryOpcode::Mul => "mul",
            BinaryOpcode::Div => "div",
            BinaryOpcode::Mod => "mod",
            BinaryOpcode::BitAnd => "band",
            BinaryOpcode::BitOr => "bor",
            BinaryOpcode::BitXor => "bxor",
            BinaryOpcode::Shl => "shl",
            BinaryOpcode::Shr => "shr",
            BinaryOpcode::Eq => "eq",
            BinaryOpcode::Neq => "neq",
            BinaryOpcode::Lt => "lt",
            BinaryOpcode::Leq => "leq",
            BinaryOpcode::Gt => "gt",
            BinaryOpcode::Geq => "geq",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOpcode::Eq
                | BinaryOpcode::Neq
                | BinaryOpcode::Lt
                | BinaryOpcode::Leq
                | BinaryOpcode::Gt
                | BinaryOpcode::Geq
        )
    }

    /// Machine semantics at operation width `width`.
    ///
    /// Operands are narrowed to `width` first. Division and remainder
    /// truncate toward zero; shifts are logical with the count masked to
    /// `bits - 1`. Returns `None` where the hardware would trap (division by
    /// zero, `MIN / -1`).
    pub fn apply(self, lhs: i64, rhs: i64, width: Width) -> Option<i64> {
        let a = width.truncate(lhs);
        let b = width.truncate(rhs);
        let count = (b as u32) & (width.bits() - 1);

        let result = match self {
            BinaryOpcode::Add => a.wrapping_add(b),
            BinaryOpcode::Sub => a.wrapping_sub(b),
            BinaryOpcode::Mul => a.wrapping_mul(b),
            BinaryOpcode::Div | BinaryOpcode::Mod => {
                let min = width.truncate(1i64 << (width.bits() - 1));
                if b == 0 || (a == min && b == -1) {
                    return None;
                }
                if self == BinaryOpcode::Div { a / b } else { a % b }
            }
            BinaryOpcode::BitAnd => a & b,
            BinaryOpcode::BitOr => a | b,
            BinaryOpcode::BitXor => a ^ b,
            BinaryOpcode::Shl => ((a as u64) << count) as i64,
            BinaryOpcode::Shr => (width.zero_extend(a) >> count) as i64,
            BinaryOpcode::Eq => (a == b) as i64,
            BinaryOpcode::Neq => (a != b) as i64,
            BinaryOpcode::Lt => (a < b) as i64,
            BinaryOpcode::Leq => (a <= b) as i64,
            BinaryOpcode::Gt => (a > b) as i64,
            BinaryOpcode::Geq => (a >= b) as i64,
        };

        Some(width.truncate(result))
    }
}

impl fmt::Display for BinaryOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// In-place opcodes: `dest = OP dest`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOpcode {
    Neg,
    BitNot,
    LogicalNot,
}

impl UnaryOpcode {
    /// Opcode for a source operator; unary `+` needs no instruction
    pub fn from_ast(op: UnaryOp) -> Option<Self> {
        match op {
            UnaryOp::Plus => None,
            UnaryOp::Minus => Some(UnaryOpcode::Neg),
            UnaryOp::BitNot => Some(UnaryOpcode::BitNot),
            UnaryOp::LogicalNot => Some(UnaryOpcode::LogicalNot),
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            UnaryOpcode::Neg => "neg",
            UnaryOpcode::BitNot => "not",
            UnaryOpcode::LogicalNot => "lnot",
        }
    }

    pub fn apply(self, value: i64, width: Width) -> i64 {
        let a = width.truncate(value);
        let result = match self {
            UnaryOpcode::Neg => a.wrapping_neg(),
            UnaryOpcode::BitNot => !a,
            UnaryOpcode::LogicalNot => (a == 0) as i64,
        };
        width.truncate(result)
    }
}

impl fmt::Display for UnaryOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// IR Instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// dest = literal
    LoadConst { dest: String, value: i64 },

    /// dest = src
    Copy { dest: String, src: String },

    /// dest = lhs op rhs
    Binary {
        op: BinaryOpcode,
        dest: String,
        lhs: Operand,
        rhs: Operand,
    },

    /// dest = op dest
    Unary { op: UnaryOpcode, dest: String },

    /// Hand `value` back and leave through the epilogue
    Return { value: String },

    /// Transfer control to the block labelled `label`
    Jump { label: String },
}

impl Instruction {
    /// Every symbol name the instruction mentions
    pub fn symbols(&self) -> Vec<&str> {
        match self {
            Instruction::LoadConst { dest, .. } | Instruction::Unary { dest, .. } => vec![dest],
            Instruction::Copy { dest, src } => vec![dest, src],
            Instruction::Binary { dest, lhs, rhs, .. } => {
                let mut names = vec![dest.as_str()];
                names.extend(lhs.as_var());
                names.extend(rhs.as_var());
                names
            }
            Instruction::Return { value } => vec![value],
            Instruction::Jump { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::LoadConst { dest, value } => write!(f, "ldconst {dest}, ${value}"),
            Instruction::Copy { dest, src } => write!(f, "copy {dest}, {src}"),
            Instruction::Binary { op, dest, lhs, rhs } => write!(f, "{op} {dest}, {lhs}, {rhs}"),
            Instruction::Unary { op, dest } => write!(f, "{op} {dest}"),
            Instruction::Return { value } => write!(f, "ret {value}"),
            Instruction::Jump { label } => write!(f, "jmp {label}"),
        }
    }
}
