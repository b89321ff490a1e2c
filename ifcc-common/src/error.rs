//! Error handling for the ifcc compiler
//! 
//! This module defines the fatal error taxonomy shared by every phase and
//! the diagnostic/reporting utilities used to print errors and warnings.

use crate::source_loc::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation.
///
/// Every variant is fatal: compilation stops at the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("{message}")]
    LexError {
        location: SourceLocation,
        message: String,
    },

    #[error("syntax error: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
    },

    #[error("'{name}' already declared")]
    DuplicateDeclaration {
        name: String,
        location: SourceLocation,
        first_declared: SourceLocation,
    },

    #[error("variable '{name}' is not declared")]
    UndeclaredVariable {
        name: String,
        location: SourceLocation,
    },

    #[error("variable '{name}' is used before being initialized")]
    UseBeforeInitialization {
        name: String,
        location: SourceLocation,
    },

    #[error("'{keyword}' statement not within a loop")]
    LoopControlOutsideLoop {
        keyword: String,
        location: SourceLocation,
    },

    #[error("code generation failed: {message}")]
    CodegenError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a lexer error
    pub fn lexer_error(message: String, location: SourceLocation) -> Self {
        CompilerError::LexError { location, message }
    }
    
    /// Create a parse error
    pub fn parse_error(message: String, location: SourceLocation) -> Self {
        CompilerError::ParseError { location, message }
    }

    /// Create a codegen error
    pub fn codegen_error(message: String) -> Self {
        CompilerError::CodegenError { message }
    }

    /// Source position of the error, when it has one
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            CompilerError::LexError { location, .. }
            | CompilerError::ParseError { location, .. }
            | CompilerError::DuplicateDeclaration { location, .. }
            | CompilerError::UndeclaredVariable { location, .. }
            | CompilerError::UseBeforeInitialization { location, .. }
            | CompilerError::LoopControlOutsideLoop { location, .. } => {
                (!location.is_dummy()).then_some(*location)
            }
            CompilerError::CodegenError { .. }
            | CompilerError::IoError { .. }
            | CompilerError::InternalError { .. } => None,
        }
    }

    /// Attach a source position to an error raised without one.
    ///
    /// Symbol table lookups only know names; the lowering driver knows where
    /// the name was written and fills the position in here.
    pub fn at(mut self, position: SourceLocation) -> Self {
        match &mut self {
            CompilerError::LexError { location, .. }
            | CompilerError::ParseError { location, .. }
            | CompilerError::DuplicateDeclaration { location, .. }
            | CompilerError::UndeclaredVariable { location, .. }
            | CompilerError::UseBeforeInitialization { location, .. }
            | CompilerError::LoopControlOutsideLoop { location, .. } => {
                if location.is_dummy() {
                    *location = position;
                }
            }
            _ => {}
        }
        self
    }

    /// Render this error as a printable diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.to_string(), self.location());
        match self {
            CompilerError::DuplicateDeclaration { first_declared, .. } => {
                diagnostic.with_note(format!("first declared at {first_declared}"))
            }
            _ => diagnostic,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional location and severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: String, location: Option<SourceLocation>) -> Self {
        Self {
            severity: Severity::Error,
            message,
            location,
            notes: Vec::new(),
        }
    }

    pub fn warning(message: String, location: Option<SourceLocation>) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            location,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "{}: {}", self.severity, self.message)?;
        
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        
        Ok(())
    }
}

/// Error reporter for collecting and displaying diagnostics
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
        }
    }

    /// Record an already-built diagnostic
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    /// Report an error diagnostic
    pub fn error(&mut self, message: String, location: Option<SourceLocation>) {
        self.report(Diagnostic::error(message, location));
    }

    /// Report a warning diagnostic
    pub fn warning(&mut self, message: String, location: Option<SourceLocation>) {
        self.report(Diagnostic::warning(message, location));
    }

    /// Report every diagnostic of a batch, e.g. the warnings of one function
    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }

    /// Check if any errors have been reported
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Clear all diagnostics
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.error_count = 0;
        self.warning_count = 0;
    }

    /// Write all diagnostics, one per line
    pub fn write_diagnostics<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(out, "{diagnostic}")?;
        }
        Ok(())
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match (self.error_count, self.warning_count) {
            (0, 0) => "No errors or warnings".to_string(),
            (0, w) => format!("{} warning{}", w, if w == 1 { "" } else { "s" }),
            (e, 0) => format!("{} error{}", e, if e == 1 { "" } else { "s" }),
            (e, w) => format!(
                "{} error{} and {} warning{}",
                e,
                if e == 1 { "" } else { "s" },
                w,
                if w == 1 { "" } else { "s" }
            ),
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
