//! Error types for workspace file operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during workspace file operations.
///
/// Cancellation is not an error: cancelled operations report a `false` or
/// empty result instead.
#[derive(Debug, Error)]
pub enum OpsError {
    /// A path argument escapes the workspace root.
    #[error("path is outside the workspace: {} (root: {})", path.display(), root.display())]
    OutsideWorkspace { path: PathBuf, root: PathBuf },

    /// Missing source file or directory.
    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// The workspace root (or another required directory) is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// A sibling with the requested name already exists.
    #[error("'{}' already exists", path.display())]
    AlreadyExists { path: PathBuf },

    /// A destination collision occurred and no resolver was supplied.
    #[error("name conflict at {} was not resolved", path.display())]
    ConflictUnresolved { path: PathBuf },

    /// An import set has no entry from which a common parent can be derived.
    #[error("cannot determine a common parent directory for the import set")]
    NoCommonRoot,

    /// Copying or moving a directory into its own subtree.
    #[error("cannot copy or move a directory into itself: {}", path.display())]
    SourceIsAncestor { path: PathBuf },

    /// Moving a directory onto itself.
    #[error("destination is the same directory: {}", path.display())]
    SameDirectory { path: PathBuf },

    /// Moving a directory onto a path occupied by a file.
    #[error("a file occupies the destination path: {}", path.display())]
    FileAtDestination { path: PathBuf },

    /// A file or directory name failed validation.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The workspace root is not an absolute path.
    #[error("workspace root must be an absolute path: {}", path.display())]
    InvalidRoot { path: PathBuf },

    /// The soft-delete primitive failed for an entry.
    #[error("failed to move {} to the trash: {message}", path.display())]
    Trash { path: PathBuf, message: String },

    /// Generic I/O error.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OpsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid-name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_classification() {
        let err = OpsError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, OpsError::PermissionDenied { .. }));

        let err = OpsError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, OpsError::NotFound { .. }));

        let err = OpsError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::WriteZero, "short"),
        );
        assert!(matches!(err, OpsError::Io { .. }));
    }

    #[test]
    fn test_display_includes_path() {
        let err = OpsError::NotFound {
            path: PathBuf::from("/ws/missing.txt"),
        };
        assert!(err.to_string().contains("/ws/missing.txt"));
    }
}
