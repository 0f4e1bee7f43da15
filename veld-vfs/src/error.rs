//! VFS error types

use thiserror::Error;

/// Result type for VFS operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Error type for VFS operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VfsError {
    /// File or directory not found
    #[error("path not found: {path}")]
    NotFound { path: String },

    /// Permission denied
    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    /// File content is not valid UTF-8
    #[error("not valid UTF-8: {path}")]
    NotUtf8 { path: String },

    /// IO error
    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        VfsError::Io {
            message: err.to_string(),
        }
    }
}
