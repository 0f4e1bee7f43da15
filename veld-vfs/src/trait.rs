//! FileSystem trait definition

use crate::error::{VfsError, VfsResult};
use crate::timestamp::Timestamp;
use std::path::Path;

/// Virtual file system trait
///
/// Provides a unified interface for the file operations the build driver
/// needs, decoupling it from any specific file system implementation.
///
/// # Implementations
/// - `MemoryFileSystem`: In-memory file system with a logical write clock
/// - `NativeFileSystem`: Native OS file system
pub trait FileSystem: Send + Sync {
    /// Read file contents
    ///
    /// # Arguments
    /// * `path` - File path
    ///
    /// # Returns
    /// File contents as bytes, or VfsError
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Write file contents
    ///
    /// Creates the file if it doesn't exist, truncates it if it does.
    /// Writing establishes the timestamp a later [`FileSystem::timestamp`]
    /// probe observes.
    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Probe the last-modified time of a path
    ///
    /// # Returns
    /// `Ok(None)` if the path does not exist; `Ok(Some(_))` with the
    /// last-modified time otherwise. Any other IO failure is an error —
    /// callers must not treat it as "absent".
    fn timestamp(&self, path: &Path) -> VfsResult<Option<Timestamp>>;

    /// Create a directory and all missing ancestors
    ///
    /// Idempotent: succeeds if the directory already exists.
    fn create_dir_all(&self, path: &Path) -> VfsResult<()>;

    /// Read file contents as UTF-8 text
    fn read_text(&self, path: &Path) -> VfsResult<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|_| VfsError::NotUtf8 {
            path: path.to_string_lossy().to_string(),
        })
    }
}
