//! Compiler backend boundary
//!
//! The driver never lexes, type-checks, or generates code itself; all of
//! that lives behind [`CompilerBackend`]. The associated `Ast` type keeps a
//! module body opaque to the driver, which only ever reads the name and
//! import list.

use crate::input::SourceOrigin;
use crate::module_id::ModuleId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named compilation unit with declared dependencies.
///
/// Created by the parser gate, consumed (never mutated) by the scheduler.
#[derive(Debug, Clone)]
pub struct Module<A> {
    /// Module identity, unique within a build
    pub name: ModuleId,
    /// Declared dependencies, in source order
    pub imports: Vec<ModuleId>,
    /// Body, opaque to the driver
    pub ast: A,
}

/// The exported surface of a compiled module.
///
/// This is everything a dependent needs from a module that is being
/// skipped as fresh; it is persisted beside the generated code as
/// `externs.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInterface {
    /// Dotted module name
    pub module: String,
    /// Exported value names, in declaration order
    pub exports: Vec<String>,
}

/// Generated output for one module
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    /// Generated code text
    pub code: String,
    /// Exported interface, persisted for later incremental runs
    pub interface: ModuleInterface,
}

/// A single parse failure, tagged with its origin label.
///
/// The label is the source path for file records and empty for builtin
/// records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub origin: String,
    pub message: String,
}

impl ParseError {
    pub fn new(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.origin.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.origin, self.message)
        }
    }
}

impl std::error::Error for ParseError {}

/// Backend-reported failure while compiling one module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unresolved name '{name}'{context}")]
    UnresolvedName { name: String, context: String },

    #[error("no interface available for imported module {import}")]
    MissingInterface { import: String },

    #[error("{0}")]
    Other(String),
}

/// The external compiler collaborator.
///
/// Both operations are black boxes to the driver: `parse_module` turns raw
/// text into a [`Module`], `compile` turns a module plus its dependencies'
/// interfaces into a [`CompiledArtifact`]. Backend-tuning options
/// (optimization, comment retention, diagnostic verbosity) are the
/// backend's own configuration, carried at construction time.
pub trait CompilerBackend {
    /// The backend's module body representation
    type Ast;

    /// Parse one record's text into a module
    fn parse_module(
        &self,
        origin: &SourceOrigin,
        text: &str,
    ) -> Result<Module<Self::Ast>, ParseError>;

    /// Compile one module against its dependencies' interfaces.
    ///
    /// `deps` holds the interfaces of the module's imports in import
    /// order; imports the driver could not resolve are absent.
    fn compile(
        &self,
        module: &Module<Self::Ast>,
        deps: &[ModuleInterface],
    ) -> Result<CompiledArtifact, CompileError>;
}
