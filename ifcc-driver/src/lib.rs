//! ifcc - Compiler Driver Library
//!
//! Runs the whole pipeline: parse, lower to a control-flow graph, generate
//! x86-64 assembly. The `ifcc` binary is a thin command-line layer over
//! [`compile_file`].

use ifcc_codegen::Target;
use ifcc_common::{CompilerError, Diagnostic};
use ifcc_frontend::Frontend;
use ifcc_ir::{lower_program, Cfg, LoweredFunction};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Knobs for one compilation
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Write assembly here instead of returning it for stdout
    pub output: Option<PathBuf>,

    /// Save the IR listing (next to the input unless `ir_output` is set)
    pub save_ir: bool,
    pub ir_output: Option<PathBuf>,

    /// Serialize the finished CFG as JSON to this path
    pub emit_cfg_json: Option<PathBuf>,

    pub target: Target,
}

/// Result of a successful compilation
#[derive(Debug, Clone)]
pub struct Compilation {
    pub assembly: String,
    pub cfg: Cfg,
    pub warnings: Vec<Diagnostic>,
}

/// Compile source text held in memory
pub fn compile_source(source: &str, target: Target) -> Result<Compilation, CompilerError> {
    let program = Frontend::parse_source(source)?;
    let LoweredFunction { cfg, warnings } = lower_program(&program)?;
    debug!("lowered '{}' into {} blocks", cfg.name, cfg.blocks.len());

    let assembly = ifcc_backend::compile_cfg(&cfg, target)?;
    Ok(Compilation { assembly, cfg, warnings })
}

/// Compile a source file and write every requested artifact.
///
/// Nothing is written unless the whole pipeline succeeds.
pub fn compile_file(input: &Path, options: &CompileOptions) -> Result<Compilation, CompilerError> {
    info!("compiling {} for {}", input.display(), options.target);
    let source = fs::read_to_string(input).map_err(|e| CompilerError::IoError {
        message: format!("{}: {e}", input.display()),
    })?;

    let compilation = compile_source(&source, options.target)?;

    if options.save_ir {
        let path = options
            .ir_output
            .clone()
            .unwrap_or_else(|| input.with_extension("ir"));
        write_artifact(&path, &compilation.cfg.to_string())?;
    }

    if let Some(path) = &options.emit_cfg_json {
        let json = compilation
            .cfg
            .to_json()
            .map_err(|e| CompilerError::InternalError { message: format!("CFG serialization failed: {e}") })?;
        write_artifact(path, &json)?;
    }

    if let Some(path) = &options.output {
        write_artifact(path, &compilation.assembly)?;
    }

    Ok(compilation)
}

fn write_artifact(path: &Path, contents: &str) -> Result<(), CompilerError> {
    debug!("writing {}", path.display());
    fs::write(path, contents).map_err(|e| CompilerError::IoError {
        message: format!("{}: {e}", path.display()),
    })
}
