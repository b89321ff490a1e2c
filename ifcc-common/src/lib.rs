//! ifcc - Common Types and Utilities
//! 
//! This crate contains shared types, error definitions, and utilities
//! used across all components of the ifcc compiler.

pub mod error;
pub mod types;
pub mod source_loc;

pub use error::{CompilerError, Diagnostic, ErrorReporter, Severity};
pub use types::*;
pub use source_loc::SourceLocation;
