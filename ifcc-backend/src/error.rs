//! Backend failure modes

use ifcc_codegen::FrameError;
use ifcc_common::{BlockId, CompilerError};
use ifcc_ir::CfgError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("no stack slot for '{0}'")]
    UnknownSymbol(String),

    #[error("jump to unknown label '{0}'")]
    UnknownLabel(String),

    #[error("reference to missing block {0}")]
    UnknownBlock(BlockId),

    #[error("invalid control-flow graph: {0}")]
    InvalidCfg(#[from] CfgError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        CompilerError::codegen_error(err.to_string())
    }
}
