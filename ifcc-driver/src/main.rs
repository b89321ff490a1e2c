//! ifcc Compiler Driver
//!
//! Compiles a single-function C source file to x86-64 assembly.

use clap::Parser;
use ifcc_codegen::Target;
use ifcc_common::ErrorReporter;
use ifcc_driver::{compile_file, CompileOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ifcc")]
#[command(about = "Compile a C subset to x86-64 assembly")]
#[command(version)]
struct Cli {
    /// Input C source file
    input: PathBuf,

    /// Output assembly file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the IR listing to stderr
    #[arg(long)]
    print_ir: bool,

    /// Save IR to file with .ir extension
    #[arg(long)]
    save_ir: bool,

    /// Specify output path for IR file (used with --save-ir)
    #[arg(long, requires = "save_ir")]
    ir_output: Option<PathBuf>,

    /// Write the control-flow graph as JSON
    #[arg(long, value_name = "FILE")]
    emit_cfg_json: Option<PathBuf>,

    /// Target platform: linux or macos (defaults to the host)
    #[arg(long)]
    target: Option<Target>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let options = CompileOptions {
        output: cli.output,
        save_ir: cli.save_ir,
        ir_output: cli.ir_output,
        emit_cfg_json: cli.emit_cfg_json,
        target: cli.target.unwrap_or_default(),
    };

    let compilation = match compile_file(&cli.input, &options) {
        Ok(compilation) => compilation,
        Err(e) => {
            eprintln!("{}", e.to_diagnostic());
            return ExitCode::FAILURE;
        }
    };

    let mut reporter = ErrorReporter::new();
    reporter.extend(compilation.warnings);
    if reporter.warning_count() > 0 {
        reporter.print_diagnostics();
        eprintln!("{} generated", reporter.summary());
    }

    if cli.print_ir {
        eprintln!("{}", compilation.cfg);
    }

    if options.output.is_none() {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(compilation.assembly.as_bytes()) {
            eprintln!("error: failed to write assembly: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
