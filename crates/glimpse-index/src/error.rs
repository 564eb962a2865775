//! Error types for folder scanning.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced when the root of a scan cannot be used.
///
/// Failures below the root are never reported here; an unreadable
/// subdirectory becomes a folder node with no children.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root path does not exist.
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// The root path exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The root path could not be read.
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other I/O failure while opening the root.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised while accessing `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound(path),
            io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path),
            _ => ScanError::Io { path, source },
        }
    }

    /// The path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ScanError::NotFound(path)
            | ScanError::NotADirectory(path)
            | ScanError::PermissionDenied(path)
            | ScanError::Io { path, .. } => path,
        }
    }
}

/// Result type for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_classifies_kinds() {
        let err = ScanError::from_io("/a", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ScanError::NotFound(_)));

        let err = ScanError::from_io("/a", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, ScanError::PermissionDenied(_)));

        let err = ScanError::from_io("/a", io::Error::other("boom"));
        assert!(matches!(err, ScanError::Io { .. }));
        assert_eq!(err.path(), std::path::Path::new("/a"));
    }
}
