//! Move and rename operations.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use atelier_core::{OpsError, WorkspaceRoot, paths_equal_ci};

use crate::cleanup;
use crate::naming::{unique_file_name, validate_filename};

/// Rename a file or directory in place, returning the new path.
///
/// A change of letter case only would be silently ignored by a
/// case-insensitive file system, so it is routed through a temporary
/// unique name first, then to the final casing.
pub(crate) fn rename(
    root: &WorkspaceRoot,
    path: &Path,
    new_name: &str,
) -> Result<PathBuf, OpsError> {
    root.ensure_contained(path)?;
    validate_filename(new_name)?;

    if !path.exists() {
        return Err(OpsError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let current = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let target = parent.join(new_name);

    let case_only = current.eq_ignore_ascii_case(new_name) && current != new_name;

    if !case_only && target.exists() {
        return Err(OpsError::AlreadyExists { path: target });
    }

    debug!(from = %path.display(), to = %target.display(), "renaming");

    if case_only {
        let staging = parent.join(unique_file_name(&parent.join(format!("{current}.renaming"))));
        fs::rename(path, &staging).map_err(|e| OpsError::io(path, e))?;
        fs::rename(&staging, &target).map_err(|e| OpsError::io(&target, e))?;
    } else {
        fs::rename(path, &target).map_err(|e| OpsError::io(path, e))?;
    }

    Ok(target)
}

/// Move a file to a new path inside the workspace.
///
/// Moving onto the same resolved path is a no-op; an existing destination
/// file is replaced.
pub(crate) fn move_file(
    root: &WorkspaceRoot,
    path: &Path,
    destination: &Path,
) -> Result<(), OpsError> {
    root.ensure_contained(path)?;
    root.ensure_contained(destination)?;

    if !path.is_file() {
        return Err(OpsError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let destination_parent = destination.parent().unwrap_or(Path::new(""));
    if !destination_parent.is_dir() {
        return Err(OpsError::NotFound {
            path: destination_parent.to_path_buf(),
        });
    }

    if paths_equal_ci(path, destination) {
        return Ok(());
    }

    debug!(from = %path.display(), to = %destination.display(), "moving file");

    if destination.exists() {
        fs::remove_file(destination).map_err(|e| OpsError::io(destination, e))?;
    }

    fs::rename(path, destination).map_err(|e| OpsError::io(path, e))
}

/// Move a directory to a new path inside the workspace.
///
/// Moving a directory onto itself is an error, with the occupant's kind
/// distinguished in the error. On failure, a partially created destination
/// is cleaned up before the error propagates.
pub(crate) fn move_directory(
    root: &WorkspaceRoot,
    path: &Path,
    destination: &Path,
) -> Result<(), OpsError> {
    root.ensure_contained(path)?;
    root.ensure_contained(destination)?;

    if !path.is_dir() {
        return Err(OpsError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let destination_parent = destination.parent().unwrap_or(Path::new(""));
    if !destination_parent.is_dir() {
        return Err(OpsError::NotFound {
            path: destination_parent.to_path_buf(),
        });
    }

    if destination != path && destination.starts_with(path) {
        return Err(OpsError::SourceIsAncestor {
            path: path.to_path_buf(),
        });
    }

    if paths_equal_ci(path, destination) {
        return Err(if destination.is_dir() {
            OpsError::SameDirectory {
                path: destination.to_path_buf(),
            }
        } else {
            OpsError::FileAtDestination {
                path: destination.to_path_buf(),
            }
        });
    }

    debug!(from = %path.display(), to = %destination.display(), "moving directory");

    if let Err(error) = fs::rename(path, destination) {
        if destination.exists() {
            let _ = cleanup::cleanup_directory(destination);
        }
        return Err(OpsError::io(path, error));
    }

    Ok(())
}
