//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::timestamp::Timestamp;
use crate::FileSystem;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
struct FileEntry {
    content: Vec<u8>,
    mtime: Timestamp,
}

/// An in-memory file system implementation.
///
/// All files are stored in memory using a `BTreeMap`, making it suitable
/// for testing the incremental build logic without touching a disk.
/// Every write advances a logical clock, so "newer than" relations between
/// files are exactly the order in which they were written; [`MemoryFileSystem::touch`]
/// gives a file the current clock value without changing its content.
///
/// # Example
/// ```
/// use veld_vfs::{FileSystem, MemoryFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.write_file(Path::new("/src.veld"), b"module A").unwrap();
/// fs.write_file(Path::new("/out.js"), b"...").unwrap();
/// let src = fs.timestamp(Path::new("/src.veld")).unwrap().unwrap();
/// let out = fs.timestamp(Path::new("/out.js")).unwrap().unwrap();
/// assert!(src < out);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<String, FileEntry>>>,
    dirs: Arc<RwLock<BTreeSet<String>>>,
    clock: Arc<AtomicU64>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(BTreeMap::new())),
            dirs: Arc::new(RwLock::new(BTreeSet::new())),
            clock: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a new memory file system pre-populated with files.
    ///
    /// # Arguments
    /// * `files` - Iterator of (path, content) tuples
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.write_file(Path::new(path.as_ref()), &content)
                .unwrap_or_else(|_| unreachable!("memory write cannot fail"));
        }
        fs
    }

    /// Re-stamp a file with the current clock value, leaving content as is.
    pub fn touch(&self, path: &Path) -> VfsResult<()> {
        let normalized = normalize_path(path);
        let mtime = self.tick();
        let mut files = self.files.write().map_err(|_| poisoned())?;
        match files.get_mut(&normalized) {
            Some(entry) => {
                entry.mtime = mtime;
                Ok(())
            }
            None => Err(VfsError::NotFound { path: normalized }),
        }
    }

    /// All file paths currently stored, in sorted order.
    pub fn file_paths(&self) -> Vec<String> {
        match self.files.read() {
            Ok(files) => files.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn tick(&self) -> Timestamp {
        Timestamp::from_tick(self.clock.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Normalize a path string for internal storage.
/// Uses forward slashes consistently for cross-platform compatibility.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn poisoned() -> VfsError {
    VfsError::Io {
        message: String::from("lock poisoned"),
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let normalized = normalize_path(path);
        let files = self.files.read().map_err(|_| poisoned())?;
        files
            .get(&normalized)
            .map(|entry| entry.content.clone())
            .ok_or(VfsError::NotFound { path: normalized })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        let normalized = normalize_path(path);
        let mtime = self.tick();
        let mut files = self.files.write().map_err(|_| poisoned())?;
        files.insert(
            normalized,
            FileEntry {
                content: content.to_vec(),
                mtime,
            },
        );
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        let in_files = self
            .files
            .read()
            .map(|files| files.contains_key(&normalized))
            .unwrap_or(false);
        in_files
            || self
                .dirs
                .read()
                .map(|dirs| dirs.contains(&normalized))
                .unwrap_or(false)
    }

    fn timestamp(&self, path: &Path) -> VfsResult<Option<Timestamp>> {
        let normalized = normalize_path(path);
        let files = self.files.read().map_err(|_| poisoned())?;
        Ok(files.get(&normalized).map(|entry| entry.mtime))
    }

    fn create_dir_all(&self, path: &Path) -> VfsResult<()> {
        let mut dirs = self.dirs.write().map_err(|_| poisoned())?;
        let mut current = Some(path);
        while let Some(dir) = current {
            if !dir.as_os_str().is_empty() {
                dirs.insert(normalize_path(dir));
            }
            current = dir.parent();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_fs_is_empty() {
        let fs = MemoryFileSystem::new();
        assert!(!fs.exists(Path::new("/anything.txt")));
        assert!(fs.file_paths().is_empty());
    }

    #[test]
    fn test_write_and_read() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/test.txt");

        fs.write_file(path, b"hello world").unwrap();

        let content = fs.read_file(path).unwrap();
        assert_eq!(content, b"hello world");
    }

    #[test]
    fn test_read_nonexistent() {
        let fs = MemoryFileSystem::new();
        let result = fs.read_file(Path::new("/nonexistent.txt"));

        assert!(matches!(result.unwrap_err(), VfsError::NotFound { .. }));
    }

    #[test]
    fn test_overwrite_file() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/overwrite.txt");

        fs.write_file(path, b"first").unwrap();
        fs.write_file(path, b"second").unwrap();

        let content = fs.read_file(path).unwrap();
        assert_eq!(content, b"second");
    }

    #[test]
    fn test_with_files() {
        let fs = MemoryFileSystem::with_files([
            ("/a.txt", b"content a".to_vec()),
            ("/b.txt", b"content b".to_vec()),
        ]);

        assert_eq!(fs.read_file(Path::new("/a.txt")).unwrap(), b"content a");
        assert_eq!(fs.read_file(Path::new("/b.txt")).unwrap(), b"content b");
    }

    #[test]
    fn test_timestamp_missing_is_none() {
        let fs = MemoryFileSystem::new();
        assert_eq!(fs.timestamp(Path::new("/none.txt")).unwrap(), None);
    }

    #[test]
    fn test_write_order_is_timestamp_order() {
        let fs = MemoryFileSystem::new();
        fs.write_file(Path::new("/first.txt"), b"1").unwrap();
        fs.write_file(Path::new("/second.txt"), b"2").unwrap();

        let first = fs.timestamp(Path::new("/first.txt")).unwrap().unwrap();
        let second = fs.timestamp(Path::new("/second.txt")).unwrap().unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_overwrite_advances_timestamp() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/f.txt");
        fs.write_file(path, b"1").unwrap();
        let before = fs.timestamp(path).unwrap().unwrap();

        fs.write_file(path, b"2").unwrap();
        let after = fs.timestamp(path).unwrap().unwrap();
        assert!(before < after);
    }

    #[test]
    fn test_touch_advances_timestamp_keeps_content() {
        let fs = MemoryFileSystem::new();
        let src = Path::new("/src.veld");
        let out = Path::new("/out.js");
        fs.write_file(src, b"module A").unwrap();
        fs.write_file(out, b"js").unwrap();

        fs.touch(src).unwrap();

        let src_ts = fs.timestamp(src).unwrap().unwrap();
        let out_ts = fs.timestamp(out).unwrap().unwrap();
        assert!(src_ts > out_ts);
        assert_eq!(fs.read_file(src).unwrap(), b"module A");
    }

    #[test]
    fn test_touch_missing_fails() {
        let fs = MemoryFileSystem::new();
        let result = fs.touch(Path::new("/missing.txt"));
        assert!(matches!(result.unwrap_err(), VfsError::NotFound { .. }));
    }

    #[test]
    fn test_create_dir_all_and_exists() {
        let fs = MemoryFileSystem::new();
        let dir = Path::new("/out/Math.Utils");

        fs.create_dir_all(dir).unwrap();

        assert!(fs.exists(dir));
        assert!(fs.exists(Path::new("/out")));
    }

    #[test]
    fn test_clone_shares_data() {
        let fs1 = MemoryFileSystem::new();
        let path = Path::new("/shared.txt");

        fs1.write_file(path, b"shared").unwrap();

        let fs2 = fs1.clone();
        assert!(fs2.exists(path));

        fs2.write_file(path, b"modified").unwrap();
        assert_eq!(fs1.read_file(path).unwrap(), b"modified");
    }

    #[test]
    fn test_concurrent_reads() {
        let fs = MemoryFileSystem::with_files([("/test.txt", b"concurrent".to_vec())]);
        let mut handles = vec![];

        for _ in 0..10 {
            let fs_clone = fs.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let content = fs_clone.read_file(Path::new("/test.txt")).unwrap();
                    assert_eq!(content, b"concurrent");
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_file_paths_sorted() {
        let fs = MemoryFileSystem::new();
        fs.write_file(Path::new("/b.txt"), b"b").unwrap();
        fs.write_file(Path::new("/a.txt"), b"a").unwrap();

        assert_eq!(fs.file_paths(), vec!["/a.txt", "/b.txt"]);
    }
}
