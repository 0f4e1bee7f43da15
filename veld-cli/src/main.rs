//! Veld CLI - incremental module builds
//!
//! Thin wiring over `veld-make`: parse arguments, pick collaborators,
//! run the build, print errors, exit.

use clap::Parser;
use std::path::PathBuf;
use std::process;

mod logging;

use logging::LogFormat;
use veld_compiler::Compiler;
use veld_config::{CodegenConfig, MakeConfig};
use veld_make::{build, ConsoleProgress};
use veld_vfs::NativeFileSystem;

#[derive(Parser)]
#[command(
    name = "veld",
    about = "Incremental build driver for veld modules",
    version
)]
struct Cli {
    /// Module source files to build
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Output directory for generated code
    #[arg(short = 'o', long = "output", default_value = "output")]
    output: PathBuf,

    /// Do not inject the builtin prelude
    #[arg(long)]
    no_prelude: bool,

    /// Omit the generated-by header comment
    #[arg(long)]
    no_header: bool,

    /// Disable backend optimization
    #[arg(long)]
    no_opt: bool,

    /// Keep source comments in generated code
    #[arg(long)]
    comments: bool,

    /// Include source-line context in error messages
    #[arg(long)]
    verbose_errors: bool,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,

    /// Log format: pretty, compact, json
    #[arg(long, default_value = "compact", value_name = "FORMAT")]
    log_format: String,
}

fn main() {
    let cli = Cli::parse();

    let level = match logging::parse_level(&cli.log_level) {
        Some(level) => level,
        None => {
            eprintln!("Error: unknown log level '{}'", cli.log_level);
            process::exit(1);
        }
    };
    let format = match LogFormat::parse(&cli.log_format) {
        Some(format) => format,
        None => {
            eprintln!("Error: unknown log format '{}'", cli.log_format);
            process::exit(1);
        }
    };
    logging::init(level, format);

    let header_lines = if cli.no_header {
        Vec::new()
    } else {
        vec![format!("// Generated by veld {}", env!("CARGO_PKG_VERSION"))]
    };
    let config = MakeConfig {
        output_dir: cli.output,
        header_lines,
        include_prelude: !cli.no_prelude,
    };
    let codegen = CodegenConfig {
        optimize: !cli.no_opt,
        keep_comments: cli.comments,
        verbose_errors: cli.verbose_errors,
    };

    let fs = NativeFileSystem::new();
    let backend = Compiler::new(codegen);
    let progress = ConsoleProgress;

    match build(&fs, &backend, &progress, &config, &cli.files) {
        Ok(summary) => {
            tracing::info!(
                target: "veld::make",
                rebuilt = summary.rebuilt.len(),
                skipped = summary.skipped.len(),
                "done"
            );
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}
