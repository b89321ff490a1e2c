//! Expression parsing
//!
//! Binary operators are handled by precedence climbing; every level is
//! left-associative.

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};
use ifcc_common::CompilerError;

/// Map a token to the binary operator it spells, if any
fn binary_op(token_type: &TokenType) -> Option<BinaryOp> {
    let op = match token_type {
        TokenType::Plus => BinaryOp::Add,
        TokenType::Minus => BinaryOp::Sub,
        TokenType::Star => BinaryOp::Mul,
        TokenType::Slash => BinaryOp::Div,
        TokenType::Percent => BinaryOp::Mod,
        TokenType::Ampersand => BinaryOp::BitAnd,
        TokenType::Pipe => BinaryOp::BitOr,
        TokenType::Caret => BinaryOp::BitXor,
        TokenType::LeftShift => BinaryOp::LeftShift,
        TokenType::RightShift => BinaryOp::RightShift,
        TokenType::AmpersandAmpersand => BinaryOp::LogicalAnd,
        TokenType::PipePipe => BinaryOp::LogicalOr,
        TokenType::EqualEqual => BinaryOp::Equal,
        TokenType::BangEqual => BinaryOp::NotEqual,
        TokenType::Less => BinaryOp::Less,
        TokenType::Greater => BinaryOp::Greater,
        TokenType::LessEqual => BinaryOp::LessEqual,
        TokenType::GreaterEqual => BinaryOp::GreaterEqual,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    pub fn parse_expression(&mut self) -> Result<Expression, CompilerError> {
        self.parse_binary_expression(1)
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<Expression, CompilerError> {
        let mut left = self.parse_unary_expression()?;

        while let Some(op) = binary_op(self.peek_type()) {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            let location = self.advance().location;
            let right = self.parse_binary_expression(precedence + 1)?;
            left = Expression::binary(op, left, right, location);
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expression, CompilerError> {
        let op = match self.peek_type() {
            TokenType::Plus => Some(UnaryOp::Plus),
            TokenType::Minus => Some(UnaryOp::Minus),
            TokenType::Bang => Some(UnaryOp::LogicalNot),
            TokenType::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };

        match op {
            Some(op) => {
                let location = self.advance().location;
                let operand = self.parse_unary_expression()?;
                Ok(Expression::unary(op, operand, location))
            }
            None => self.parse_primary_expression(),
        }
    }

    fn parse_primary_expression(&mut self) -> Result<Expression, CompilerError> {
        let token = self.advance();
        let location = token.location;

        match token.token_type {
            TokenType::IntLiteral(value) => Ok(Expression::int(value, location)),
            TokenType::Identifier(name) => Ok(Expression::identifier(name, location)),
            TokenType::LeftParen => {
                let inner = self.parse_expression()?;
                self.expect(TokenType::RightParen, "to close parenthesised expression")?;
                Ok(Expression::new(ExpressionKind::Parenthesized(Box::new(inner)), location))
            }
            _ => Err(ParseError::unexpected("expression", token).into()),
        }
    }
}
