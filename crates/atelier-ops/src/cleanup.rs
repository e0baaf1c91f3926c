//! Best-effort removal of partially created destination trees.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::batch;
use crate::naming::unique_directory_name;

/// What became of a cleanup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The directory is gone.
    Removed,
    /// Both attempts failed; the directory at the contained path remains
    /// as residue.
    Residue(PathBuf),
}

/// Remove a directory tree, with a move-aside fallback for entries locked
/// by another process.
///
/// Deletion in place can fail while the tree is still allowed to be
/// renamed; in that case the directory is moved to a sibling temporary
/// name and deletion is retried once. A second failure is reported as
/// [`CleanupOutcome::Residue`] and logged, never raised.
pub fn cleanup_directory(directory: &Path) -> CleanupOutcome {
    if !directory.exists() {
        return CleanupOutcome::Removed;
    }

    if fs::remove_dir_all(directory).is_ok() {
        return CleanupOutcome::Removed;
    }

    let parent = directory.parent().unwrap_or(Path::new("")).to_path_buf();
    let name = directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let aside = parent.join(unique_directory_name(
        &parent.join(format!("{name}.discarded")),
    ));

    if fs::rename(directory, &aside).is_ok() {
        if fs::remove_dir_all(&aside).is_ok() {
            return CleanupOutcome::Removed;
        }
        warn!(path = %aside.display(), "cleanup left residue after move-aside");
        return CleanupOutcome::Residue(aside);
    }

    warn!(path = %directory.display(), "cleanup left residue");
    CleanupOutcome::Residue(directory.to_path_buf())
}

/// Undo the paths a cancelled or failed batch created: files first, then
/// directories deepest-first.
pub(crate) fn rollback(created: &[PathBuf]) {
    let mut directories: Vec<PathBuf> = Vec::new();

    for path in created {
        if path.is_dir() {
            directories.push(path.clone());
        } else if path.exists() {
            let _ = fs::remove_file(path);
        }
    }

    batch::sort_descending_by_path_length(&mut directories);
    for directory in &directories {
        if directory.exists() {
            let _ = cleanup_directory(directory);
        }
    }
}
