//! Error types for the build driver
//!
//! Every variant is fatal to the build invocation as a whole; there is no
//! per-module recovery or skip-and-continue mode.

use crate::backend::{CompileError, ParseError};
use crate::module_id::ModuleId;
use thiserror::Error;
use veld_vfs::VfsError;

/// Main build driver error type
#[derive(Error, Debug)]
pub enum MakeError {
    #[error("IO error [{path}]: {source}")]
    Io {
        path: String,
        #[source]
        source: VfsError,
    },

    #[error("file system error: {0}")]
    Vfs(#[from] VfsError),

    #[error("{}", render_parse_failures(.0))]
    Parse(Vec<ParseError>),

    #[error("cyclic dependency between modules: {}", render_cycle(.0))]
    Cycle(Vec<ModuleId>),

    #[error("compile error in module {module}: {source}")]
    Compile {
        module: String,
        #[source]
        source: CompileError,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MakeError {
    fn from(err: serde_json::Error) -> Self {
        MakeError::Serialization(err.to_string())
    }
}

fn render_parse_failures(failures: &[ParseError]) -> String {
    let mut out = format!(
        "{} parse error{}:",
        failures.len(),
        if failures.len() == 1 { "" } else { "s" }
    );
    for failure in failures {
        out.push_str("\n  ");
        out.push_str(&failure.to_string());
    }
    out
}

fn render_cycle(modules: &[ModuleId]) -> String {
    modules
        .iter()
        .map(ModuleId::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
