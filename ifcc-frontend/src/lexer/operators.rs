//! Operator and comment scanning for the lexer

use crate::lexer::{Lexer, TokenType};
use ifcc_common::CompilerError;

impl Lexer {
    /// Tokenize line comment
    pub fn tokenize_line_comment(&mut self) -> TokenType {
        self.advance(); // Skip first '/'
        self.advance(); // Skip second '/'

        let mut comment = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            comment.push(ch);
            self.advance();
        }

        TokenType::LineComment(comment)
    }

    /// Tokenize block comment
    pub fn tokenize_block_comment(&mut self) -> Result<TokenType, CompilerError> {
        let start = self.current_location();
        self.advance(); // Skip '/'
        self.advance(); // Skip '*'

        let mut comment = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '*' && self.peek_char(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(TokenType::BlockComment(comment));
            }
            comment.push(ch);
            self.advance();
        }

        Err(CompilerError::lexer_error(
            "unterminated block comment".to_string(),
            start,
        ))
    }

    /// Consume the current character; a following `=` selects `with_equal`
    pub(crate) fn operator_or_assign(&mut self, plain: TokenType, with_equal: TokenType) -> TokenType {
        self.advance();
        if self.current_char() == Some('=') {
            self.advance();
            with_equal
        } else {
            plain
        }
    }

    /// Scan `<`, `<=`, `<<`, `<<=` (and the `>` family when `ch` is `>`)
    pub(crate) fn tokenize_angle(&mut self, ch: char) -> TokenType {
        let less = ch == '<';
        self.advance();
        match self.current_char() {
            Some(next) if next == ch => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    if less { TokenType::LeftShiftEqual } else { TokenType::RightShiftEqual }
                } else if less {
                    TokenType::LeftShift
                } else {
                    TokenType::RightShift
                }
            }
            Some('=') => {
                self.advance();
                if less { TokenType::LessEqual } else { TokenType::GreaterEqual }
            }
            _ => {
                if less { TokenType::Less } else { TokenType::Greater }
            }
        }
    }

    /// Scan `&`, `&&`, `&=` (and the `|` family when `ch` is `|`)
    pub(crate) fn tokenize_doubled(&mut self, ch: char) -> TokenType {
        let amp = ch == '&';
        self.advance();
        match self.current_char() {
            Some(next) if next == ch => {
                self.advance();
                if amp { TokenType::AmpersandAmpersand } else { TokenType::PipePipe }
            }
            Some('=') => {
                self.advance();
                if amp { TokenType::AmpersandEqual } else { TokenType::PipeEqual }
            }
            _ => {
                if amp { TokenType::Ampersand } else { TokenType::Pipe }
            }
        }
    }
}
