//! Artifact writing

use crate::backend::CompiledArtifact;
use crate::error::MakeError;
use crate::progress::Progress;
use std::path::Path;
use veld_vfs::FileSystem;

/// Generated code file name inside a module's artifact directory
pub const CODE_FILE: &str = "index.js";
/// Interface file name inside a module's artifact directory
pub const EXTERNS_FILE: &str = "externs.json";

/// Writes one module's artifacts into its output directory.
///
/// Every ancestor directory is created first (idempotently); existing
/// content is overwritten unconditionally. The write itself establishes
/// the timestamp the next build's staleness probe observes.
pub struct OutputWriter<'a> {
    fs: &'a dyn FileSystem,
    progress: &'a dyn Progress,
}

impl<'a> OutputWriter<'a> {
    pub fn new(fs: &'a dyn FileSystem, progress: &'a dyn Progress) -> Self {
        Self { fs, progress }
    }

    /// Write code and interface for one module, header lines first.
    pub fn write_artifact(
        &self,
        module_dir: &Path,
        artifact: &CompiledArtifact,
        header_lines: &[String],
    ) -> Result<(), MakeError> {
        self.fs.create_dir_all(module_dir)?;

        let code_path = module_dir.join(CODE_FILE);
        let mut code = String::new();
        for line in header_lines {
            code.push_str(line);
            code.push('\n');
        }
        code.push_str(&artifact.code);
        self.fs.write_file(&code_path, code.as_bytes())?;
        self.progress.emit(&format!("Writing {}", code_path.display()));

        let externs_path = module_dir.join(EXTERNS_FILE);
        let externs = serde_json::to_string_pretty(&artifact.interface)?;
        self.fs.write_file(&externs_path, externs.as_bytes())?;
        self.progress
            .emit(&format!("Writing {}", externs_path.display()));

        tracing::debug!(target: "veld::emit", dir = %module_dir.display(), "wrote artifact");
        Ok(())
    }
}
