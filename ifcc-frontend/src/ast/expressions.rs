//! Expression syntax tree nodes

use super::ops::{BinaryOp, UnaryOp};
use ifcc_common::SourceLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Integer or character literal
    IntLiteral(i64),
    
    /// Identifier reference
    Identifier(String),
    
    /// `( expr )`
    Parenthesized(Box<Expression>),
    
    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    
    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn new(kind: ExpressionKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    pub fn int(value: i64, location: SourceLocation) -> Self {
        Self::new(ExpressionKind::IntLiteral(value), location)
    }

    pub fn identifier(name: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ExpressionKind::Identifier(name.into()), location)
    }

    pub fn unary(op: UnaryOp, operand: Expression, location: SourceLocation) -> Self {
        Self::new(
            ExpressionKind::Unary { op, operand: Box::new(operand) },
            location,
        )
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression, location: SourceLocation) -> Self {
        Self::new(
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        )
    }
}
