//! The workspace root and its containment boundary.

use std::path::{Component, Path, PathBuf};

use crate::OpsError;

/// The sandbox boundary directory.
///
/// Every path handed to a public operation must resolve to this directory
/// or a descendant of it. The value is immutable for the lifetime of the
/// engine instance and safe to share across concurrent readers.
#[derive(Debug, Clone)]
pub struct WorkspaceRoot {
    path: PathBuf,
}

impl WorkspaceRoot {
    /// Create a workspace root from an absolute directory path.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, OpsError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(OpsError::InvalidRoot { path });
        }
        Ok(Self {
            path: normalize_lexically(&path),
        })
    }

    /// The root directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `candidate` is the root itself or lies under it.
    ///
    /// Purely lexical: `.` and `..` segments are resolved without touching
    /// the file system, then the candidate's ancestor chain is compared
    /// against the root case-insensitively.
    pub fn contains(&self, candidate: &Path) -> bool {
        let candidate = normalize_lexically(candidate);
        candidate
            .ancestors()
            .any(|ancestor| paths_equal_ci(ancestor, &self.path))
    }

    /// Fail with a containment violation unless `candidate` is under the root.
    pub fn ensure_contained(&self, candidate: &Path) -> Result<(), OpsError> {
        if self.contains(candidate) {
            Ok(())
        } else {
            Err(OpsError::OutsideWorkspace {
                path: candidate.to_path_buf(),
                root: self.path.clone(),
            })
        }
    }
}

/// Resolve `.` and `..` components without touching the file system.
///
/// A `..` at the root is dropped; trailing separators disappear with the
/// component walk.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if popped {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Case-insensitive path equality, component by component.
pub fn paths_equal_ci(a: &Path, b: &Path) -> bool {
    let mut left = a.components();
    let mut right = b.components();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) => {
                let x = x.as_os_str().to_string_lossy();
                let y = y.as_os_str().to_string_lossy();
                if x.to_lowercase() != y.to_lowercase() {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_must_be_absolute() {
        assert!(WorkspaceRoot::new("relative/path").is_err());
        assert!(WorkspaceRoot::new("/absolute/path").is_ok());
    }

    #[test]
    fn test_contains_root_and_descendants() {
        let root = WorkspaceRoot::new("/ws/project").unwrap();

        assert!(root.contains(Path::new("/ws/project")));
        assert!(root.contains(Path::new("/ws/project/")));
        assert!(root.contains(Path::new("/ws/project/sub/file.txt")));
    }

    #[test]
    fn test_rejects_outside_paths() {
        let root = WorkspaceRoot::new("/ws/project").unwrap();

        assert!(!root.contains(Path::new("/ws")));
        assert!(!root.contains(Path::new("/ws/other")));
        assert!(!root.contains(Path::new("/etc/passwd")));
        // A sibling sharing the root as a name prefix is still outside.
        assert!(!root.contains(Path::new("/ws/project2/file.txt")));
    }

    #[test]
    fn test_rejects_dot_dot_escape() {
        let root = WorkspaceRoot::new("/ws/project").unwrap();

        assert!(!root.contains(Path::new("/ws/project/../other")));
        assert!(!root.contains(Path::new("/ws/project/sub/../../../etc")));
        // Staying inside through `..` is fine.
        assert!(root.contains(Path::new("/ws/project/sub/../file.txt")));
    }

    #[test]
    fn test_case_insensitive_match() {
        let root = WorkspaceRoot::new("/ws/Project").unwrap();

        assert!(root.contains(Path::new("/WS/PROJECT/file.txt")));
        assert!(root.contains(Path::new("/ws/project")));
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/a/./b/../c/")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize_lexically(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_lexically(Path::new("a/../../b")), PathBuf::from("b"));
    }
}
