//! Literal scanning for the lexer
//!
//! Decimal, hexadecimal and character literals all become `IntLiteral`.

use crate::lexer::{Lexer, TokenType};
use ifcc_common::CompilerError;

impl Lexer {
    /// Tokenize an integer literal
    pub fn tokenize_integer(&mut self) -> Result<TokenType, CompilerError> {
        let start = self.current_location();
        let mut number = String::new();

        if self.current_char() == Some('0') && matches!(self.peek_char(1), Some('x' | 'X')) {
            self.advance(); // '0'
            self.advance(); // 'x'

            while let Some(ch) = self.current_char() {
                if ch.is_ascii_hexdigit() {
                    number.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }

            if number.is_empty() {
                return Err(CompilerError::lexer_error(
                    "invalid hexadecimal literal".to_string(),
                    start,
                ));
            }

            // 0xffffffffffffffff and friends wrap into the signed range
            let value = u64::from_str_radix(&number, 16).map_err(|_| {
                CompilerError::lexer_error(
                    format!("integer literal 0x{number} is too large"),
                    start,
                )
            })?;

            return Ok(TokenType::IntLiteral(value as i64));
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.current_char(), Some(ch) if ch.is_alphabetic() || ch == '_') {
            return Err(CompilerError::lexer_error(
                format!("invalid suffix on integer literal {number}"),
                self.current_location(),
            ));
        }

        let value = number.parse::<i64>().map_err(|_| {
            CompilerError::lexer_error(format!("integer literal {number} is too large"), start)
        })?;

        Ok(TokenType::IntLiteral(value))
    }

    /// Tokenize a character literal into its integer value
    pub fn tokenize_char_literal(&mut self) -> Result<TokenType, CompilerError> {
        let start = self.current_location();
        self.advance(); // Skip opening quote

        let value = match self.current_char() {
            Some('\\') => {
                self.advance();
                let escaped = match self.current_char() {
                    Some('n') => b'\n',
                    Some('t') => b'\t',
                    Some('r') => b'\r',
                    Some('0') => 0,
                    Some('\\') => b'\\',
                    Some('\'') => b'\'',
                    Some('"') => b'"',
                    Some(c) => {
                        return Err(CompilerError::lexer_error(
                            format!("invalid escape sequence '\\{c}'"),
                            self.current_location(),
                        ));
                    }
                    None => {
                        return Err(CompilerError::lexer_error(
                            "unterminated character literal".to_string(),
                            start,
                        ));
                    }
                };
                self.advance();
                escaped as i64
            }
            Some(ch) if ch != '\'' && ch != '\n' => {
                self.advance();
                ch as i64
            }
            Some('\'') => {
                return Err(CompilerError::lexer_error(
                    "empty character literal".to_string(),
                    start,
                ));
            }
            _ => {
                return Err(CompilerError::lexer_error(
                    "unterminated character literal".to_string(),
                    start,
                ));
            }
        };

        if self.current_char() != Some('\'') {
            return Err(CompilerError::lexer_error(
                "unterminated character literal".to_string(),
                start,
            ));
        }
        self.advance(); // Skip closing quote

        Ok(TokenType::IntLiteral(value))
    }
}
