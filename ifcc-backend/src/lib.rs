//! ifcc - Backend
//!
//! Lowers a finished control-flow graph to x86-64 assembly in AT&T syntax.
//! Every IR value keeps its stack slot; instruction selection only decides
//! the operand form (immediate, slot or scratch register) and the width
//! suffix of each emitted instruction.

pub mod error;
pub mod function;
pub mod instr;
pub mod slots;

pub use error::CodegenError;
pub use function::FunctionBuilder;
pub use slots::StackSlots;

use ifcc_codegen::{AsmInst, Target};
use ifcc_common::CompilerError;
use ifcc_ir::Cfg;

/// Generate the instruction stream for one function
pub fn generate(cfg: &Cfg, target: Target) -> Result<Vec<AsmInst>, CodegenError> {
    FunctionBuilder::new(cfg, target)?.build()
}

/// Generate assembly text for one function
pub fn compile_cfg(cfg: &Cfg, target: Target) -> Result<String, CompilerError> {
    let insts = generate(cfg, target)?;
    Ok(ifcc_codegen::emit(&insts))
}
