//! ifcc - Frontend
//! 
//! This crate provides the frontend components of the ifcc compiler:
//! - Lexer: tokenizes source text
//! - Parser: builds the syntax tree from tokens
//! - AST: syntax tree definitions and the `Visitor` traversal contract

pub mod lexer;
pub mod parser;
pub mod ast;

pub use lexer::{Lexer, Token, TokenType};
pub use parser::{ParseError, Parser};
pub use ast::{
    AssignOp, BinaryOp, Declaration, Declarator, Expression, ExpressionKind, FunctionDefinition,
    Identifier, Program, Statement, StatementKind, UnaryOp, Visitor,
};

use ifcc_common::CompilerError;
use log::debug;

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse source text into a syntax tree
    pub fn parse_source(source: &str) -> Result<Program, CompilerError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        debug!("lexed {} tokens", tokens.len());

        let mut parser = Parser::new(tokens);
        let program = parser.parse_program()?;
        debug!(
            "parsed '{}' with {} top-level statements",
            program.function.name,
            program.function.body.len()
        );

        Ok(program)
    }
}
