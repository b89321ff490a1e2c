//! Lexer for the accepted C subset
//! 
//! Turns source text into a stream of tokens: keywords, identifiers,
//! integer and character literals, operators, delimiters and comments.

pub mod token;
pub mod literals;
pub mod operators;

pub use token::{Token, TokenType};

use ifcc_common::{CompilerError, SourceLocation};
use std::collections::HashMap;

pub struct Lexer {
    pub(crate) input: Vec<char>,
    pub(crate) position: usize,
    pub(crate) line: u32,
    pub(crate) column: u32,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(input: &str) -> Self {
        let keywords = [
            ("break", TokenType::Break),
            ("char", TokenType::Char),
            ("continue", TokenType::Continue),
            ("else", TokenType::Else),
            ("if", TokenType::If),
            ("int", TokenType::Int),
            ("long", TokenType::Long),
            ("return", TokenType::Return),
            ("short", TokenType::Short),
            ("while", TokenType::While),
        ]
        .into_iter()
        .collect();

        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords,
        }
    }
    
    pub(crate) fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }
    
    pub(crate) fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
    
    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }
    
    pub(crate) fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
    
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
    
    /// Tokenize an identifier or keyword
    fn tokenize_identifier(&mut self) -> TokenType {
        let mut identifier = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        
        match self.keywords.get(identifier.as_str()) {
            Some(keyword) => keyword.clone(),
            None => TokenType::Identifier(identifier),
        }
    }

    fn single(&mut self, token_type: TokenType) -> TokenType {
        self.advance();
        token_type
    }
    
    /// Get next token
    pub fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_whitespace();
        
        let start_location = self.current_location();
        
        let token_type = match self.current_char() {
            None => TokenType::EndOfFile,
            
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => self.tokenize_identifier(),
            Some(ch) if ch.is_ascii_digit() => self.tokenize_integer()?,
            Some('\'') => self.tokenize_char_literal()?,

            Some('/') if self.peek_char(1) == Some('/') => self.tokenize_line_comment(),
            Some('/') if self.peek_char(1) == Some('*') => self.tokenize_block_comment()?,
            
            Some('+') => self.operator_or_assign(TokenType::Plus, TokenType::PlusEqual),
            Some('-') => self.operator_or_assign(TokenType::Minus, TokenType::MinusEqual),
            Some('*') => self.operator_or_assign(TokenType::Star, TokenType::StarEqual),
            Some('/') => self.operator_or_assign(TokenType::Slash, TokenType::SlashEqual),
            Some('%') => self.operator_or_assign(TokenType::Percent, TokenType::PercentEqual),
            Some('^') => self.operator_or_assign(TokenType::Caret, TokenType::CaretEqual),
            Some('=') => self.operator_or_assign(TokenType::Equal, TokenType::EqualEqual),
            Some('!') => self.operator_or_assign(TokenType::Bang, TokenType::BangEqual),
            Some(ch @ ('<' | '>')) => self.tokenize_angle(ch),
            Some(ch @ ('&' | '|')) => self.tokenize_doubled(ch),
            Some('~') => self.single(TokenType::Tilde),
            
            Some('(') => self.single(TokenType::LeftParen),
            Some(')') => self.single(TokenType::RightParen),
            Some('{') => self.single(TokenType::LeftBrace),
            Some('}') => self.single(TokenType::RightBrace),
            Some(';') => self.single(TokenType::Semicolon),
            Some(',') => self.single(TokenType::Comma),
            
            Some(ch) => {
                return Err(CompilerError::lexer_error(
                    format!("unexpected character '{ch}'"),
                    start_location,
                ));
            }
        };
        
        Ok(Token::new(token_type, start_location))
    }
    
    /// Tokenize entire input, ending with `EndOfFile`
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompilerError> {
        let mut tokens = Vec::new();
        
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::EndOfFile);
            tokens.push(token);
            
            if is_eof {
                break;
            }
        }
        
        Ok(tokens)
    }
}
