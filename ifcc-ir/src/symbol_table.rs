//! Stack-frame allocator and declaration registry for one function
//!
//! Every symbol gets a fixed, never reused offset below the frame base. The
//! cursor is advanced by the symbol's size *before* the offset is taken, so
//! the first 4-byte variable lives at `-4(%rbp)`.

use ifcc_common::{CompilerError, Diagnostic, SourceLocation, Width};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle of a symbol; ordered so that `status < Used` means "never read"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SymbolStatus {
    Declared,
    Initialized,
    Used,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub width: Width,
    pub location: SourceLocation,
    /// Distance below the frame base, in bytes
    pub offset: u32,
    pub status: SymbolStatus,
    pub is_temporary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    cursor: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(
        &mut self,
        name: &str,
        width: Width,
        location: SourceLocation,
        status: SymbolStatus,
        is_temporary: bool,
    ) -> Result<u32, CompilerError> {
        if let Some(existing) = self.get(name) {
            return Err(CompilerError::DuplicateDeclaration {
                name: name.to_string(),
                location,
                first_declared: existing.location,
            });
        }

        self.cursor += width.bytes();
        let offset = self.cursor;

        self.index.insert(name.to_string(), self.symbols.len());
        self.symbols.push(Symbol {
            name: name.to_string(),
            width,
            location,
            offset,
            status,
            is_temporary,
        });

        Ok(offset)
    }

    /// Declare a user variable and return its offset
    pub fn declare(&mut self, name: &str, width: Width, location: SourceLocation) -> Result<u32, CompilerError> {
        let offset = self.insert(name, width, location, SymbolStatus::Declared, false)?;
        debug!("declared '{name}' ({width}) at -{offset}(%rbp)");
        Ok(offset)
    }

    /// Declare a compiler temporary; it never triggers an unused warning
    pub fn declare_temporary(&mut self, name: &str, width: Width) -> Result<u32, CompilerError> {
        let offset = self.insert(name, width, SourceLocation::dummy(), SymbolStatus::Used, true)?;
        trace!("temporary '{name}' ({width}) at -{offset}(%rbp)");
        Ok(offset)
    }

    /// Offset of a declared symbol.
    ///
    /// With `allow_uninitialized == false` the symbol must have been
    /// assigned before, which is what every read requires.
    pub fn offset_of(&self, name: &str, allow_uninitialized: bool) -> Result<u32, CompilerError> {
        let symbol = self.lookup(name)?;
        if !allow_uninitialized && symbol.status < SymbolStatus::Initialized {
            return Err(CompilerError::UseBeforeInitialization {
                name: name.to_string(),
                location: SourceLocation::dummy(),
            });
        }
        Ok(symbol.offset)
    }

    pub fn mark_initialized(&mut self, name: &str) -> Result<(), CompilerError> {
        let symbol = self.lookup_mut(name)?;
        symbol.status = symbol.status.max(SymbolStatus::Initialized);
        Ok(())
    }

    pub fn mark_used(&mut self, name: &str) -> Result<(), CompilerError> {
        self.lookup_mut(name)?.status = SymbolStatus::Used;
        Ok(())
    }

    /// One warning per symbol that was never read, in declaration order
    pub fn check_unused(&self) -> Vec<Diagnostic> {
        self.symbols
            .iter()
            .filter(|s| s.status < SymbolStatus::Used && !s.is_temporary)
            .map(|s| {
                Diagnostic::warning(
                    format!("variable '{}' is never used", s.name),
                    (!s.location.is_dummy()).then_some(s.location),
                )
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    pub fn width_of(&self, name: &str) -> Result<Width, CompilerError> {
        Ok(self.lookup(name)?.width)
    }

    /// Symbols in declaration (and therefore offset) order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Bytes handed out so far
    pub fn allocated_bytes(&self) -> u32 {
        self.cursor
    }

    /// Bytes to reserve below the frame base, keeping `%rsp` 16-byte aligned
    pub fn frame_size(&self) -> u32 {
        self.cursor.div_ceil(16) * 16
    }

    fn lookup(&self, name: &str) -> Result<&Symbol, CompilerError> {
        self.get(name).ok_or_else(|| CompilerError::UndeclaredVariable {
            name: name.to_string(),
            location: SourceLocation::dummy(),
        })
    }

    fn lookup_mut(&mut self, name: &str) -> Result<&mut Symbol, CompilerError> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.symbols[i]),
            None => Err(CompilerError::UndeclaredVariable {
                name: name.to_string(),
                location: SourceLocation::dummy(),
            }),
        }
    }
}
