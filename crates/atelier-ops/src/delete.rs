//! Recursive soft-delete, deepest entries first.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use atelier_core::{OpsError, WorkspaceRoot};

use crate::batch;
use crate::enumerate;
use crate::progress::DeleteObserver;

/// The recoverable-trash primitive consumed by the delete engine.
///
/// The default implementation sends entries to the operating system trash;
/// embedders can substitute their own recoverable store. Each call is
/// treated as atomic per item.
pub trait SoftDelete: Send + Sync {
    /// Move the entry at `path` to a recoverable location.
    fn soft_delete(&self, path: &Path) -> Result<(), OpsError>;
}

/// Soft delete via the operating system trash.
#[derive(Debug, Default)]
pub struct SystemTrash;

impl SoftDelete for SystemTrash {
    fn soft_delete(&self, path: &Path) -> Result<(), OpsError> {
        trash::delete(path).map_err(|e| OpsError::Trash {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Soft-delete a single file, propagating failure.
pub(crate) fn delete_file(
    root: &WorkspaceRoot,
    trash_bin: &dyn SoftDelete,
    path: &Path,
) -> Result<(), OpsError> {
    root.ensure_contained(path)?;

    if !path.is_file() {
        return Err(OpsError::NotFound {
            path: path.to_path_buf(),
        });
    }

    trash_bin.soft_delete(path)
}

/// Recursively soft-delete a directory.
///
/// Visible files go first, then directories deepest-first, then the
/// directory itself. Cancellation is honored before every item, and any
/// single soft-delete failure stops the sequence with a `false` result.
/// `Ok(true)` is returned only when the directory no longer exists
/// afterwards.
pub(crate) async fn delete_directory(
    root: &WorkspaceRoot,
    trash_bin: &dyn SoftDelete,
    path: &Path,
    on_delete: Option<&DeleteObserver>,
    cancel: &CancellationToken,
    metadata_file: &str,
) -> Result<bool, OpsError> {
    root.ensure_contained(path)?;

    // Already gone; nothing to do.
    if !path.exists() {
        return Ok(true);
    }

    debug!(path = %path.display(), "deleting directory");

    let files = enumerate::walk_files(path, true, metadata_file);
    let mut directories = enumerate::walk_directories(path, true);
    batch::sort_descending_by_path_length(&mut directories);

    let items = files
        .into_iter()
        .chain(directories)
        .chain(std::iter::once(path.to_path_buf()));

    for item in items {
        if cancel.is_cancelled() {
            return Ok(false);
        }

        if let Some(observer) = on_delete {
            observer(&item);
        }

        if trash_bin.soft_delete(&item).is_err() {
            return Ok(false);
        }

        tokio::task::yield_now().await;
    }

    Ok(!path.exists())
}
