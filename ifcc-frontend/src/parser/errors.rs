//! Parse error types
//! 
//! Parser-local errors converted into `CompilerError::ParseError` at the
//! crate boundary.

use crate::lexer::{Token, TokenType};
use ifcc_common::{CompilerError, SourceLocation};

#[derive(Debug, Clone)]
pub enum ParseError {
    UnexpectedToken {
        expected: String,
        found: Token,
    },
    UnexpectedEndOfFile {
        expected: String,
        location: SourceLocation,
    },
    InvalidStatement {
        message: String,
        location: SourceLocation,
    },
}

impl From<ParseError> for CompilerError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnexpectedToken { expected, found } => CompilerError::parse_error(
                format!("expected {}, found '{}'", expected, found.token_type),
                found.location,
            ),
            ParseError::UnexpectedEndOfFile { expected, location } => CompilerError::parse_error(
                format!("unexpected end of file, expected {expected}"),
                location,
            ),
            ParseError::InvalidStatement { message, location } => {
                CompilerError::parse_error(message, location)
            }
        }
    }
}

impl ParseError {
    /// Build the right error for an unexpected `found` token
    pub fn unexpected(expected: impl Into<String>, found: Token) -> Self {
        let expected = expected.into();
        if found.token_type == TokenType::EndOfFile {
            ParseError::UnexpectedEndOfFile { expected, location: found.location }
        } else {
            ParseError::UnexpectedToken { expected, found }
        }
    }
}
