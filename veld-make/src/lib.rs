//! Veld Make
//!
//! Incremental, dependency-ordered build driver: given a set of module
//! source files, decide which modules need recompilation, invoke the
//! compiler backend for stale ones in dependency order, and write generated
//! artifacts under one directory per module. Modules whose output is
//! already newer than their source are skipped; artifact presence and
//! timestamps are the only persisted incremental state.
//!
//! The compiler itself sits behind [`CompilerBackend`]; the file system
//! sits behind [`veld_vfs::FileSystem`]; progress reporting sits behind
//! [`Progress`]. All three are injected, so the full staleness and
//! propagation logic runs deterministically in memory in tests.

pub mod backend;
pub mod error;
pub mod input;
pub mod module_id;
pub mod output;
pub mod parse;
pub mod plan;
pub mod prelude;
pub mod progress;
pub mod scheduler;

pub use backend::{CompiledArtifact, CompileError, CompilerBackend, Module, ModuleInterface, ParseError};
pub use error::MakeError;
pub use input::{load_inputs, InputRecord, RebuildPolicy, SourceOrigin};
pub use module_id::{ModuleId, ModuleIdError};
pub use output::OutputWriter;
pub use parse::{parse_all, BuildUnit};
pub use plan::BuildPlan;
pub use progress::{BufferProgress, ConsoleProgress, Progress, SilentProgress};
pub use scheduler::{BuildSummary, Make};

use std::path::PathBuf;
use veld_config::MakeConfig;
use veld_vfs::FileSystem;

/// Run a complete build: load inputs, parse them all, resolve the plan,
/// and schedule rebuilds.
///
/// This is the one-call surface the CLI uses; each stage is also usable on
/// its own.
pub fn build<B: CompilerBackend>(
    fs: &dyn FileSystem,
    backend: &B,
    progress: &dyn Progress,
    config: &MakeConfig,
    paths: &[PathBuf],
) -> Result<BuildSummary, MakeError> {
    let records = load_inputs(fs, paths, config.include_prelude)?;
    let units = parse_all(backend, &records)?;
    let plan = BuildPlan::resolve(units)?;
    Make::new(fs, backend, progress, config).run(&plan)
}
