//! Veld reference compiler backend
//!
//! A deliberately small implementation of the [`CompilerBackend`] seam:
//! line-oriented parsing of `module` / `import` / `def` declarations and
//! code generation to CommonJS-style JavaScript. The build driver treats
//! this crate the same way it would treat a full compiler.

pub mod ast;
pub mod codegen;
pub mod parse;

pub use ast::{Def, Expr, ModuleAst};

use veld_config::CodegenConfig;
use veld_make::{
    CompiledArtifact, CompileError, CompilerBackend, Module, ModuleInterface, ParseError,
    SourceOrigin,
};

/// The reference compiler.
///
/// Backend-tuning options (optimization, comment retention, diagnostic
/// verbosity) are fixed at construction and consulted by both parsing and
/// code generation.
pub struct Compiler {
    config: CodegenConfig,
}

impl Compiler {
    pub fn new(config: CodegenConfig) -> Self {
        Self { config }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CodegenConfig::default())
    }
}

impl CompilerBackend for Compiler {
    type Ast = ModuleAst;

    fn parse_module(
        &self,
        origin: &SourceOrigin,
        text: &str,
    ) -> Result<Module<ModuleAst>, ParseError> {
        parse::parse_module(origin, text, &self.config)
    }

    fn compile(
        &self,
        module: &Module<ModuleAst>,
        deps: &[ModuleInterface],
    ) -> Result<CompiledArtifact, CompileError> {
        codegen::compile(module, deps, &self.config)
    }
}
