//! Per-instruction lowering from IR to x86-64
//!
//! Every value lives in its stack slot between instructions; `%rax` is the
//! accumulator, `%rcx` holds right-hand operands and shift counts, `%rdx` is
//! clobbered by division.

pub mod binary;
pub mod branch;
pub mod load;
pub mod unary;

pub use binary::lower_binary;
pub use branch::{lower_jump, lower_return, lower_terminator};
pub use load::{load_operand, load_var, lower_copy, lower_load_const, store};
pub use unary::lower_unary;
