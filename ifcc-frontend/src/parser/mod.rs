//! Recursive descent parser
//! 
//! Parses the token stream of a single `int main() { ... }` function into a
//! [`Program`]. Binary expressions are parsed by precedence climbing.

pub mod errors;
pub mod statements;
pub mod expressions;

use crate::ast::*;
use crate::lexer::{Token, TokenType};
use ifcc_common::{CompilerError, SourceLocation};
use std::collections::VecDeque;

pub use errors::ParseError;

pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    eof_location: SourceLocation,
}

impl Parser {
    /// Create a new parser; comments are dropped here
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof_location = tokens
            .last()
            .map(|t| t.location)
            .unwrap_or_else(SourceLocation::dummy);

        let filtered_tokens: VecDeque<Token> = tokens
            .into_iter()
            .filter(|t| {
                !matches!(
                    t.token_type,
                    TokenType::LineComment(_) | TokenType::BlockComment(_)
                )
            })
            .collect();

        Self {
            tokens: filtered_tokens,
            eof_location,
        }
    }
    
    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub(crate) fn peek_type(&self) -> &TokenType {
        self.peek().map(|t| &t.token_type).unwrap_or(&TokenType::EndOfFile)
    }
    
    /// Get current token and advance
    pub(crate) fn advance(&mut self) -> Token {
        self.tokens
            .pop_front()
            .unwrap_or_else(|| Token::new(TokenType::EndOfFile, self.eof_location))
    }
    
    /// Check if current token matches expected type
    pub(crate) fn check(&self, token_type: &TokenType) -> bool {
        std::mem::discriminant(self.peek_type()) == std::mem::discriminant(token_type)
    }
    
    /// Consume token if it matches expected type
    pub(crate) fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }
    
    /// Expect and consume a specific token type
    pub(crate) fn expect(&mut self, token_type: TokenType, context: &str) -> Result<Token, ParseError> {
        let token = self.advance();
        if std::mem::discriminant(&token.token_type) == std::mem::discriminant(&token_type) {
            Ok(token)
        } else {
            Err(ParseError::unexpected(format!("'{token_type}' {context}"), token))
        }
    }

    /// Expect an identifier and return it with its location
    pub(crate) fn expect_identifier(&mut self, context: &str) -> Result<Identifier, ParseError> {
        let token = self.advance();
        match token.token_type {
            TokenType::Identifier(name) => Ok(Identifier::new(name, token.location)),
            _ => Err(ParseError::unexpected(format!("identifier {context}"), token)),
        }
    }
    
    /// Get current location for error reporting
    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().map(|t| t.location).unwrap_or(self.eof_location)
    }
    
    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program, CompilerError> {
        let function = self.parse_function_definition()?;

        if !self.check(&TokenType::EndOfFile) {
            let token = self.advance();
            return Err(ParseError::unexpected("end of file after 'main'", token).into());
        }

        Ok(Program { function })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Result<Program, CompilerError> {
        let tokens = Lexer::new(input).tokenize()?;
        Parser::new(tokens).parse_program()
    }

    fn parse_expression_from_str(input: &str) -> Result<Expression, CompilerError> {
        let tokens = Lexer::new(input).tokenize()?;
        Parser::new(tokens).parse_expression()
    }

    fn loc(line: u32, column: u32) -> SourceLocation {
        SourceLocation::new(line, column)
    }

    #[test]
    fn test_parse_precedence() {
        let expr = parse_expression_from_str("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                BinaryOp::Add,
                Expression::int(1, loc(1, 1)),
                Expression::binary(
                    BinaryOp::Mul,
                    Expression::int(2, loc(1, 5)),
                    Expression::int(3, loc(1, 9)),
                    loc(1, 7),
                ),
                loc(1, 3),
            )
        );
    }

    #[test]
    fn test_parse_left_associativity() {
        let expr = parse_expression_from_str("a - b - c").unwrap();
        match expr.kind {
            ExpressionKind::Binary { op: BinaryOp::Sub, left, right } => {
                assert!(matches!(left.kind, ExpressionKind::Binary { op: BinaryOp::Sub, .. }));
                assert_eq!(right.kind, ExpressionKind::Identifier("c".to_string()));
            }
            other => panic!("unexpected expression {other:?}"),
        }
    }

    #[test]
    fn test_parse_logical_binds_loosest() {
        let expr = parse_expression_from_str("a < 1 || b == 2 && c").unwrap();
        match expr.kind {
            ExpressionKind::Binary { op: BinaryOp::LogicalOr, right, .. } => {
                assert!(matches!(right.kind, ExpressionKind::Binary { op: BinaryOp::LogicalAnd, .. }));
            }
            other => panic!("unexpected expression {other:?}"),
        }
    }

    #[test]
    fn test_parse_unary_and_parentheses() {
        let expr = parse_expression_from_str("-(a + 1)").unwrap();
        match expr.kind {
            ExpressionKind::Unary { op: UnaryOp::Minus, operand } => {
                assert!(matches!(operand.kind, ExpressionKind::Parenthesized(_)));
            }
            other => panic!("unexpected expression {other:?}"),
        }
        assert!(matches!(
            parse_expression_from_str("!~+x").unwrap().kind,
            ExpressionKind::Unary { op: UnaryOp::LogicalNot, .. }
        ));
    }

    #[test]
    fn test_parse_main() {
        let program = parse("int main() { int a = 5, b; b += a; return b; }").unwrap();
        let function = &program.function;
        assert_eq!(function.name, "main");
        assert_eq!(function.body.len(), 3);

        match &function.body[0].kind {
            StatementKind::Declaration(decl) => {
                assert_eq!(decl.decl_type, ifcc_common::ScalarType::Int);
                assert_eq!(decl.declarators.len(), 2);
                assert_eq!(decl.declarators[0].name.name, "a");
                assert_eq!(decl.declarators[0].name.location, loc(1, 18));
                assert!(decl.declarators[0].initializer.is_some());
                assert!(decl.declarators[1].initializer.is_none());
            }
            other => panic!("unexpected statement {other:?}"),
        }

        match &function.body[1].kind {
            StatementKind::Assignment { target, op, .. } => {
                assert_eq!(target.name, "b");
                assert_eq!(*op, AssignOp::Compound(BinaryOp::Add));
            }
            other => panic!("unexpected statement {other:?}"),
        }

        assert!(function.ends_with_return());
    }

    #[test]
    fn test_parse_control_flow() {
        let program = parse(
            "int main() { char c = 'a'; while (c) { if (c > 1) c -= 1; else break; continue; } ; }",
        )
        .unwrap();
        let body = &program.function.body;
        assert_eq!(body.len(), 3);
        match &body[1].kind {
            StatementKind::While { body, .. } => match &body.kind {
                StatementKind::Compound(inner) => {
                    assert!(matches!(inner[0].kind, StatementKind::If { else_stmt: Some(_), .. }));
                    assert!(matches!(inner[1].kind, StatementKind::Continue));
                }
                other => panic!("unexpected loop body {other:?}"),
            },
            other => panic!("unexpected statement {other:?}"),
        }
        assert!(matches!(body[2].kind, StatementKind::Empty));
        assert!(!program.function.ends_with_return());
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let program = parse("int main() { if (1) if (2) return 1; else return 2; return 3; }").unwrap();
        match &program.function.body[0].kind {
            StatementKind::If { then_stmt, else_stmt, .. } => {
                assert!(else_stmt.is_none());
                assert!(matches!(then_stmt.kind, StatementKind::If { else_stmt: Some(_), .. }));
            }
            other => panic!("unexpected statement {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors_carry_location() {
        let err = parse("int main() {\n  return 1\n}").unwrap_err();
        assert!(matches!(err, CompilerError::ParseError { .. }));
        assert_eq!(err.location(), Some(loc(3, 1)));

        assert!(parse("int main() { 1 + 2; }").is_err());
        assert!(parse("int main() { int; }").is_err());
        assert!(parse("int main() { return 0; } int").is_err());
        assert!(parse("int main() { return 0;").is_err());
        assert!(parse("int foo() { return 0; }").is_err());
    }
}
