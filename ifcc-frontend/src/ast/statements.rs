//! Statement syntax tree nodes and the function definition

use super::expressions::Expression;
use super::ops::AssignOp;
use ifcc_common::{ScalarType, SourceLocation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// `type name [= init], ...;`
    Declaration(Declaration),
    
    /// `name op= value;`
    Assignment {
        target: Identifier,
        op: AssignOp,
        value: Expression,
    },
    
    Return(Expression),
    
    If {
        condition: Expression,
        then_stmt: Box<Statement>,
        else_stmt: Option<Box<Statement>>,
    },
    
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    
    Break,
    Continue,
    
    /// Compound statement (block)
    Compound(Vec<Statement>),
    
    /// `;`
    Empty,
}

impl Statement {
    pub fn new(kind: StatementKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

/// A declaration of one or more variables sharing a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub decl_type: ScalarType,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    pub name: Identifier,
    pub initializer: Option<Expression>,
}

/// A name together with where it was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub location: SourceLocation,
}

impl Identifier {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self { name: name.into(), location }
    }
}

/// `int main() { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub return_type: ScalarType,
    pub body: Vec<Statement>,
    pub location: SourceLocation,
}

impl FunctionDefinition {
    /// Whether the last top-level statement of the body is a `return`
    pub fn ends_with_return(&self) -> bool {
        matches!(
            self.body.last(),
            Some(Statement { kind: StatementKind::Return(_), .. })
        )
    }
}

/// A whole translation unit: the single entry function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub function: FunctionDefinition,
}
