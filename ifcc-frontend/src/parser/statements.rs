//! Statement and function definition parsing

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};
use ifcc_common::{CompilerError, ScalarType};

impl Parser {
    /// `int main ( ) { statement* }`
    pub fn parse_function_definition(&mut self) -> Result<FunctionDefinition, CompilerError> {
        let type_token = self.advance();
        let return_type = match type_token.token_type {
            TokenType::Int => ScalarType::Int,
            _ => return Err(ParseError::unexpected("'int' return type of 'main'", type_token).into()),
        };

        let name = self.expect_identifier("for the function name")?;
        if name.name != "main" {
            return Err(ParseError::InvalidStatement {
                message: format!("only 'main' can be defined, found '{}'", name.name),
                location: name.location,
            }
            .into());
        }

        self.expect(TokenType::LeftParen, "after 'main'")?;
        self.expect(TokenType::RightParen, "after '('")?;
        self.expect(TokenType::LeftBrace, "to open the function body")?;
        let body = self.parse_block_items()?;

        Ok(FunctionDefinition {
            name: name.name,
            return_type,
            body,
            location: type_token.location,
        })
    }

    /// Statements up to and including the closing `}`
    fn parse_block_items(&mut self) -> Result<Vec<Statement>, CompilerError> {
        let mut statements = Vec::new();
        while !self.check(&TokenType::RightBrace) {
            if self.check(&TokenType::EndOfFile) {
                let token = self.advance();
                return Err(ParseError::unexpected("'}'", token).into());
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenType::RightBrace, "to close the block")?;
        Ok(statements)
    }

    pub fn parse_statement(&mut self) -> Result<Statement, CompilerError> {
        let location = self.current_location();

        let kind = match self.peek_type().clone() {
            TokenType::Int | TokenType::Char | TokenType::Short | TokenType::Long => {
                StatementKind::Declaration(self.parse_declaration()?)
            }
            TokenType::Return => {
                self.advance();
                let value = self.parse_expression()?;
                self.expect(TokenType::Semicolon, "after return value")?;
                StatementKind::Return(value)
            }
            TokenType::If => self.parse_if_statement()?,
            TokenType::While => {
                self.advance();
                self.expect(TokenType::LeftParen, "after 'while'")?;
                let condition = self.parse_expression()?;
                self.expect(TokenType::RightParen, "after loop condition")?;
                let body = Box::new(self.parse_statement()?);
                StatementKind::While { condition, body }
            }
            TokenType::Break => {
                self.advance();
                self.expect(TokenType::Semicolon, "after 'break'")?;
                StatementKind::Break
            }
            TokenType::Continue => {
                self.advance();
                self.expect(TokenType::Semicolon, "after 'continue'")?;
                StatementKind::Continue
            }
            TokenType::LeftBrace => {
                self.advance();
                StatementKind::Compound(self.parse_block_items()?)
            }
            TokenType::Semicolon => {
                self.advance();
                StatementKind::Empty
            }
            TokenType::Identifier(_) => self.parse_assignment()?,
            _ => {
                let token = self.advance();
                return Err(ParseError::unexpected("statement", token).into());
            }
        };

        Ok(Statement::new(kind, location))
    }

    /// `type declarator (, declarator)* ;`
    fn parse_declaration(&mut self) -> Result<Declaration, CompilerError> {
        let type_token = self.advance();
        let decl_type = match type_token.token_type {
            TokenType::Char => ScalarType::Char,
            TokenType::Short => ScalarType::Short,
            TokenType::Int => ScalarType::Int,
            TokenType::Long => ScalarType::Long,
            _ => return Err(ParseError::unexpected("type specifier", type_token).into()),
        };

        let mut declarators = Vec::new();
        loop {
            let name = self.expect_identifier("in declaration")?;
            let initializer = if self.match_token(&TokenType::Equal) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            declarators.push(Declarator { name, initializer });

            if !self.match_token(&TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::Semicolon, "after declaration")?;

        Ok(Declaration { decl_type, declarators })
    }

    /// `name assign-op expression ;`
    fn parse_assignment(&mut self) -> Result<StatementKind, CompilerError> {
        let target = self.expect_identifier("as assignment target")?;

        let op_token = self.advance();
        let op = match op_token.token_type {
            TokenType::Equal => AssignOp::Assign,
            TokenType::PlusEqual => AssignOp::Compound(BinaryOp::Add),
            TokenType::MinusEqual => AssignOp::Compound(BinaryOp::Sub),
            TokenType::StarEqual => AssignOp::Compound(BinaryOp::Mul),
            TokenType::SlashEqual => AssignOp::Compound(BinaryOp::Div),
            TokenType::PercentEqual => AssignOp::Compound(BinaryOp::Mod),
            TokenType::AmpersandEqual => AssignOp::Compound(BinaryOp::BitAnd),
            TokenType::PipeEqual => AssignOp::Compound(BinaryOp::BitOr),
            TokenType::CaretEqual => AssignOp::Compound(BinaryOp::BitXor),
            TokenType::LeftShiftEqual => AssignOp::Compound(BinaryOp::LeftShift),
            TokenType::RightShiftEqual => AssignOp::Compound(BinaryOp::RightShift),
            _ => {
                return Err(ParseError::unexpected(
                    format!("assignment operator after '{}'", target.name),
                    op_token,
                )
                .into())
            }
        };

        let value = self.parse_expression()?;
        self.expect(TokenType::Semicolon, "after assignment")?;

        Ok(StatementKind::Assignment { target, op, value })
    }

    /// `if ( expr ) statement [else statement]`
    fn parse_if_statement(&mut self) -> Result<StatementKind, CompilerError> {
        self.advance(); // 'if'
        self.expect(TokenType::LeftParen, "after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::RightParen, "after if condition")?;

        let then_stmt = Box::new(self.parse_statement()?);
        let else_stmt = if self.match_token(&TokenType::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(StatementKind::If { condition, then_stmt, else_stmt })
    }
}
