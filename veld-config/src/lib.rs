//! Veld Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all veld crates.

use std::path::PathBuf;

/// Configuration for the build driver
#[derive(Debug, Clone)]
pub struct MakeConfig {
    /// Directory that receives one subdirectory per compiled module
    pub output_dir: PathBuf,
    /// Comment lines prepended to every generated code artifact
    pub header_lines: Vec<String>,
    /// Whether the builtin prelude is injected into every build
    pub include_prelude: bool,
}

/// Configuration forwarded opaquely to the compiler backend
#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// Whether the backend may simplify generated code
    pub optimize: bool,
    /// Whether source comments are kept in generated code
    pub keep_comments: bool,
    /// Whether diagnostics include source-line context
    pub verbose_errors: bool,
}

/// Build phase enum for phase-specific log targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Load,
    Parse,
    Plan,
    Make,
    Emit,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Load => "load",
            Phase::Parse => "parse",
            Phase::Plan => "plan",
            Phase::Make => "make",
            Phase::Emit => "emit",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("veld::{}", self.as_str())
    }
}

impl MakeConfig {
    /// Create a configuration with the standard generated-by header.
    ///
    /// `version` is the tool version supplied by the caller at startup;
    /// the library itself carries no version constant.
    pub fn with_header(output_dir: impl Into<PathBuf>, version: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            header_lines: vec![format!("// Generated by veld {}", version)],
            include_prelude: true,
        }
    }
}

impl Default for MakeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            header_lines: Vec::new(),
            include_prelude: true,
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            optimize: true,
            keep_comments: false,
            verbose_errors: false,
        }
    }
}
