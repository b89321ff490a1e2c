//! Stack slot lookup for symbols

use crate::error::CodegenError;
use ifcc_codegen::{Frame, Operand};
use ifcc_common::Width;
use ifcc_ir::SymbolTable;

/// Resolves symbol names to `-offset(%rbp)` operands inside one frame
pub struct StackSlots<'a> {
    symbols: &'a SymbolTable,
    frame: Frame,
}

impl<'a> StackSlots<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Result<Self, CodegenError> {
        let frame = Frame::new(u64::from(symbols.allocated_bytes()))?;
        Ok(Self { symbols, frame })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Memory operand and declared width of `name`
    pub fn lookup(&self, name: &str) -> Result<(Operand, Width), CodegenError> {
        let symbol = self
            .symbols
            .get(name)
            .ok_or_else(|| CodegenError::UnknownSymbol(name.to_string()))?;
        let slot = self.frame.slot(symbol.offset, symbol.width)?;
        Ok((slot, symbol.width))
    }

    pub fn width_of(&self, name: &str) -> Result<Width, CodegenError> {
        self.lookup(name).map(|(_, width)| width)
    }
}
