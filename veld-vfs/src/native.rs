//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::timestamp::Timestamp;
use crate::FileSystem;
use std::io::ErrorKind;
use std::path::Path;

/// A native OS file system implementation.
///
/// This wraps `std::fs` operations and provides the `FileSystem`
/// interface for local file access.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    /// Create a new native file system.
    pub fn new() -> Self {
        Self
    }
}

fn map_err(err: std::io::Error, path: &Path) -> VfsError {
    match err.kind() {
        ErrorKind::NotFound => VfsError::NotFound {
            path: path.to_string_lossy().to_string(),
        },
        ErrorKind::PermissionDenied => VfsError::PermissionDenied {
            path: path.to_string_lossy().to_string(),
        },
        _ => err.into(),
    }
}

impl FileSystem for NativeFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_err(e, path))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        std::fs::write(path, content).map_err(|e| map_err(e, path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn timestamp(&self, path: &Path) -> VfsResult<Option<Timestamp>> {
        match std::fs::metadata(path) {
            Ok(meta) => {
                let modified = meta.modified().map_err(|e| map_err(e, path))?;
                Ok(Some(Timestamp::new(modified)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_err(e, path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> VfsResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_err(e, path))
    }
}
