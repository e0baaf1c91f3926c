//! File and directory records surfaced by the enumerator.

use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A file visible to the engine, identified by its absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
}

impl FileEntry {
    /// Create a file entry.
    pub fn new(path: impl Into<PathBuf>, size: u64, modified: Option<SystemTime>) -> Self {
        Self {
            path: path.into(),
            size,
            modified,
        }
    }

    /// Create a file entry from file system metadata.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> Self {
        Self::new(path, metadata.len(), metadata.modified().ok())
    }

    /// The file's name.
    pub fn name(&self) -> String {
        file_name_of(&self.path)
    }
}

/// A directory visible to the engine, identified by its absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Absolute path of the directory.
    pub path: PathBuf,
}

impl DirectoryEntry {
    /// Create a directory entry.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The directory's name.
    pub fn name(&self) -> String {
        file_name_of(&self.path)
    }
}

/// Whether a name marks its entry as hidden.
///
/// Hidden entries are invisible to every engine operation: never
/// enumerated, copied, moved, or deleted.
pub fn is_hidden_name(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_names() {
        let file = FileEntry::new("/ws/dir/readme.md", 12, None);
        assert_eq!(file.name(), "readme.md");

        let dir = DirectoryEntry::new("/ws/dir");
        assert_eq!(dir.name(), "dir");
    }

    #[test]
    fn test_hidden_names() {
        assert!(is_hidden_name(OsStr::new(".git")));
        assert!(is_hidden_name(OsStr::new(".atelier.json")));
        assert!(!is_hidden_name(OsStr::new("src")));
        assert!(!is_hidden_name(OsStr::new("notes.txt")));
    }
}
