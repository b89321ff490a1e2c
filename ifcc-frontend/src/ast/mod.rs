//! Syntax tree definitions
//! 
//! The tree is built by the parser and consumed through the [`Visitor`]
//! traversal contract by IR lowering.

pub mod ops;
pub mod expressions;
pub mod statements;
pub mod visitor;

pub use ops::{AssignOp, BinaryOp, UnaryOp};
pub use expressions::{Expression, ExpressionKind};
pub use statements::{
    Declaration, Declarator, FunctionDefinition, Identifier, Program, Statement, StatementKind,
};
pub use visitor::Visitor;
