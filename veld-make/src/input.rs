//! Source loading
//!
//! Inputs are read eagerly: a single missing or unreadable file aborts the
//! whole load before any parsing or compilation starts.

use crate::error::MakeError;
use crate::prelude;
use std::path::{Path, PathBuf};
use veld_vfs::FileSystem;

/// Where an input record came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// A real file on the (virtual) file system
    File(PathBuf),
    /// Builtin content with no backing file
    Builtin,
}

impl SourceOrigin {
    /// Label used to tag diagnostics; empty for builtin records
    pub fn label(&self) -> String {
        match self {
            SourceOrigin::File(path) => path.display().to_string(),
            SourceOrigin::Builtin => String::new(),
        }
    }

    /// The backing path, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceOrigin::File(path) => Some(path),
            SourceOrigin::Builtin => None,
        }
    }
}

/// Rebuild policy tag on each input unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildPolicy {
    /// Rebuild when stale relative to the module's previous output
    Normal,
    /// Always treated as fresh; never written to the output tree
    Never,
}

/// One loaded input: origin, policy, and raw source text.
///
/// Constructed once per build invocation, immutable thereafter.
#[derive(Debug, Clone)]
pub struct InputRecord {
    pub origin: SourceOrigin,
    pub policy: RebuildPolicy,
    pub text: String,
}

impl InputRecord {
    /// Record for a real source file
    pub fn file(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            origin: SourceOrigin::File(path.into()),
            policy: RebuildPolicy::Normal,
            text: text.into(),
        }
    }

    /// Record for builtin content
    pub fn builtin(text: impl Into<String>) -> Self {
        Self {
            origin: SourceOrigin::Builtin,
            policy: RebuildPolicy::Never,
            text: text.into(),
        }
    }
}

/// Read every input file eagerly, in the order given.
///
/// With `include_prelude`, the builtin prelude record is prepended so it is
/// parsed before anything that may depend on it; ordering among the rest is
/// not significant here (the build plan orders by dependency later).
pub fn load_inputs(
    fs: &dyn FileSystem,
    paths: &[PathBuf],
    include_prelude: bool,
) -> Result<Vec<InputRecord>, MakeError> {
    let mut records = Vec::with_capacity(paths.len() + 1);
    if include_prelude {
        records.push(prelude::prelude_record());
    }
    for path in paths {
        let text = fs.read_text(path).map_err(|source| MakeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(target: "veld::load", path = %path.display(), bytes = text.len(), "read input");
        records.push(InputRecord::file(path.clone(), text));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_vfs::MemoryFileSystem;

    #[test]
    fn test_load_reads_all_files() {
        let fs = MemoryFileSystem::with_files([
            ("/src/A.veld", b"module A".to_vec()),
            ("/src/B.veld", b"module B".to_vec()),
        ]);

        let paths = vec![PathBuf::from("/src/A.veld"), PathBuf::from("/src/B.veld")];
        let records = load_inputs(&fs, &paths, false).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "module A");
        assert_eq!(records[0].policy, RebuildPolicy::Normal);
        assert_eq!(
            records[0].origin,
            SourceOrigin::File(PathBuf::from("/src/A.veld"))
        );
    }

    #[test]
    fn test_prelude_is_prepended() {
        let fs = MemoryFileSystem::with_files([("/src/A.veld", b"module A".to_vec())]);

        let paths = vec![PathBuf::from("/src/A.veld")];
        let records = load_inputs(&fs, &paths, true).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].origin, SourceOrigin::Builtin);
        assert_eq!(records[0].policy, RebuildPolicy::Never);
    }

    #[test]
    fn test_missing_file_aborts_whole_load() {
        let fs = MemoryFileSystem::with_files([("/src/A.veld", b"module A".to_vec())]);

        let paths = vec![
            PathBuf::from("/src/A.veld"),
            PathBuf::from("/src/Missing.veld"),
        ];
        let result = load_inputs(&fs, &paths, false);

        match result {
            Err(MakeError::Io { path, .. }) => assert_eq!(path, "/src/Missing.veld"),
            other => panic!("expected IO error, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_origin_labels() {
        assert_eq!(
            SourceOrigin::File(PathBuf::from("x/y.veld")).label(),
            "x/y.veld"
        );
        assert_eq!(SourceOrigin::Builtin.label(), "");
        assert!(SourceOrigin::Builtin.path().is_none());
    }
}
