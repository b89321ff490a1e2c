//! Common types used throughout the compiler
//! 
//! Source-level scalar types and the operand widths they lower to are
//! shared by the front end, the IR and the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Basic block identifier: the block's index inside its CFG
pub type BlockId = usize;

/// Operand width in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Width {
    Byte,
    Word,
    Long,
    Quad,
}

impl Width {
    pub fn bytes(self) -> u32 {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
            Width::Long => 4,
            Width::Quad => 8,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes() * 8
    }

    pub fn from_bytes(bytes: u32) -> Option<Self> {
        match bytes {
            1 => Some(Width::Byte),
            2 => Some(Width::Word),
            4 => Some(Width::Long),
            8 => Some(Width::Quad),
            _ => None,
        }
    }

    /// Width at which arithmetic producing a value of this width is carried out.
    ///
    /// Byte and word results are computed in 32-bit registers.
    pub fn promoted(self) -> Self {
        self.max(Width::Long)
    }

    /// Two's-complement narrowing: keep the low bits and sign-extend them back.
    pub fn truncate(self, value: i64) -> i64 {
        match self {
            Width::Byte => value as i8 as i64,
            Width::Word => value as i16 as i64,
            Width::Long => value as i32 as i64,
            Width::Quad => value,
        }
    }

    /// The low bits of `value` as an unsigned quantity of this width
    pub fn zero_extend(self, value: i64) -> u64 {
        match self {
            Width::Byte => value as u8 as u64,
            Width::Word => value as u16 as u64,
            Width::Long => value as u32 as u64,
            Width::Quad => value as u64,
        }
    }

    /// Whether `value` can be written as a sign-extended 32-bit immediate
    pub fn fits_imm32(value: i64) -> bool {
        i32::try_from(value).is_ok()
    }
}

impl Default for Width {
    fn default() -> Self {
        Width::Quad
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.bits())
    }
}

/// Scalar types accepted in declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Char,
    Short,
    Int,
    Long,
}

impl ScalarType {
    pub fn width(self) -> Width {
        match self {
            ScalarType::Char => Width::Byte,
            ScalarType::Short => Width::Word,
            ScalarType::Int => Width::Long,
            ScalarType::Long => Width::Quad,
        }
    }

    pub fn size_in_bytes(self) -> u32 {
        self.width().bytes()
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Char => write!(f, "char"),
            ScalarType::Short => write!(f, "short"),
            ScalarType::Int => write!(f, "int"),
            ScalarType::Long => write!(f, "long"),
        }
    }
}
