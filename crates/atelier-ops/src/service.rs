//! The public face of the engine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use atelier_core::{DirectoryEntry, FileEntry, OpsError, WorkspaceConfig, WorkspaceRoot};

use crate::batch::CopyBatch;
use crate::cleanup;
use crate::conflict::ConflictHandler;
use crate::copy;
use crate::delete::{self, SoftDelete, SystemTrash};
use crate::enumerate;
use crate::export;
use crate::import;
use crate::move_op;
use crate::naming;
use crate::progress::{DeleteObserver, ProgressHandler};

/// Options for the copy-family operations (copy, import, export).
#[derive(Default)]
pub struct CopyOptions {
    /// Invoked before and after each item with the running counts.
    pub on_progress: Option<ProgressHandler>,
    /// Invoked for destination collisions while no sticky decision is
    /// active. With no handler, a collision aborts the batch.
    pub on_conflict: Option<ConflictHandler>,
    /// Cooperative cancellation, checked between items.
    pub cancel: CancellationToken,
    /// Optional pause after completion, for progress consumers that need
    /// to settle.
    pub settle: Option<Duration>,
}

/// Sandboxed file operations under a single workspace root.
///
/// The root is immutable for the lifetime of the service, and every public
/// operation re-validates that its path arguments stay inside it before
/// any I/O happens. Concurrent mutating operations on overlapping subtrees
/// are the caller's responsibility to serialize.
pub struct WorkspaceService {
    root: WorkspaceRoot,
    metadata_file: String,
    trash_bin: Box<dyn SoftDelete>,
}

impl WorkspaceService {
    /// Create a service that soft-deletes to the operating system trash.
    pub fn new(config: WorkspaceConfig) -> Result<Self, OpsError> {
        Self::with_soft_delete(config, Box::new(SystemTrash))
    }

    /// Create a service with a custom recoverable-trash primitive.
    pub fn with_soft_delete(
        config: WorkspaceConfig,
        trash_bin: Box<dyn SoftDelete>,
    ) -> Result<Self, OpsError> {
        let root = WorkspaceRoot::new(config.root)?;
        if !root.path().is_dir() {
            return Err(OpsError::NotADirectory {
                path: root.path().to_path_buf(),
            });
        }

        Ok(Self {
            root,
            metadata_file: config.metadata_file,
            trash_bin,
        })
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Copy a workspace directory (keeping its name) into another workspace
    /// directory.
    ///
    /// Returns the destination directory that was used, or `None` when the
    /// operation was cancelled and the destination rolled back.
    pub async fn copy_directory(
        &self,
        source: &Path,
        destination: &Path,
        options: CopyOptions,
    ) -> Result<Option<PathBuf>, OpsError> {
        self.root.ensure_contained(source)?;
        self.root.ensure_contained(destination)?;

        if !source.is_dir() {
            return Err(OpsError::NotFound {
                path: source.to_path_buf(),
            });
        }
        if !destination.is_dir() {
            return Err(OpsError::NotFound {
                path: destination.to_path_buf(),
            });
        }
        if destination.starts_with(source) {
            return Err(OpsError::SourceIsAncestor {
                path: source.to_path_buf(),
            });
        }

        debug!(source = %source.display(), destination = %destination.display(), "copying directory");

        let name = source.file_name().ok_or_else(|| OpsError::NotFound {
            path: source.to_path_buf(),
        })?;

        // Copying a directory next to itself duplicates it under a
        // generated name instead of merging it into itself.
        let desired = destination.join(name);
        if atelier_core::paths_equal_ci(&desired, source) {
            let duplicate = destination.join(naming::unique_directory_name(&desired));
            fs::create_dir_all(&duplicate).map_err(|e| OpsError::io(&duplicate, e))?;

            let mut batch = export::build_batch(source, &duplicate, &self.metadata_file);
            batch.created.push(duplicate.clone());
            let (completed, _) = self.execute(batch, options).await?;
            return Ok(completed.then_some(duplicate));
        }

        let sources = [source.to_path_buf()];
        let batch = import::build_batch(&sources, destination, &self.metadata_file)?;
        let (completed, batch) = self.execute(batch, options).await?;
        if !completed {
            return Ok(None);
        }

        Ok(batch.mapping.get(source).cloned())
    }

    /// Import arbitrary external files and directories into a workspace
    /// directory.
    ///
    /// The sources need not share a single root; each top-level directory
    /// keeps its own name under the destination. Returns `false` when
    /// cancelled, with the created destination entries rolled back.
    pub async fn import(
        &self,
        sources: &[PathBuf],
        destination: &Path,
        options: CopyOptions,
    ) -> Result<bool, OpsError> {
        self.root.ensure_contained(destination)?;

        if !destination.is_dir() {
            return Err(OpsError::NotFound {
                path: destination.to_path_buf(),
            });
        }

        debug!(sources = sources.len(), destination = %destination.display(), "importing");

        let batch = import::build_batch(sources, destination, &self.metadata_file)?;
        let (completed, _) = self.execute(batch, options).await?;
        Ok(completed)
    }

    /// Export a workspace directory to an external destination, which is
    /// created if missing.
    ///
    /// The source directory's own name is not reproduced: its children
    /// land directly in the destination.
    pub async fn export(
        &self,
        source: &Path,
        destination: &Path,
        options: CopyOptions,
    ) -> Result<bool, OpsError> {
        self.root.ensure_contained(source)?;

        if !source.is_dir() {
            return Err(OpsError::NotFound {
                path: source.to_path_buf(),
            });
        }
        if !destination.exists() {
            fs::create_dir_all(destination).map_err(|e| OpsError::io(destination, e))?;
        }

        debug!(source = %source.display(), destination = %destination.display(), "exporting");

        let batch = export::build_batch(source, destination, &self.metadata_file);
        let (completed, _) = self.execute(batch, options).await?;
        Ok(completed)
    }

    /// Soft-delete a single file.
    pub fn delete_file(&self, path: &Path) -> Result<(), OpsError> {
        delete::delete_file(&self.root, self.trash_bin.as_ref(), path)
    }

    /// Recursively soft-delete a directory, deepest entries first.
    ///
    /// Returns `true` only when the directory itself no longer exists
    /// afterwards; cancellation or a failed soft-delete yields `false`.
    pub async fn delete_directory(
        &self,
        path: &Path,
        on_delete: Option<DeleteObserver>,
        cancel: CancellationToken,
    ) -> Result<bool, OpsError> {
        delete::delete_directory(
            &self.root,
            self.trash_bin.as_ref(),
            path,
            on_delete.as_ref(),
            &cancel,
            &self.metadata_file,
        )
        .await
    }

    /// Rename a file or directory in place, returning the new path.
    pub fn rename(&self, path: &Path, new_name: &str) -> Result<PathBuf, OpsError> {
        move_op::rename(&self.root, path, new_name)
    }

    /// Move a file to a new path inside the workspace.
    pub fn move_file(&self, path: &Path, destination: &Path) -> Result<(), OpsError> {
        move_op::move_file(&self.root, path, destination)
    }

    /// Move a directory to a new path inside the workspace.
    pub fn move_directory(&self, path: &Path, destination: &Path) -> Result<(), OpsError> {
        move_op::move_directory(&self.root, path, destination)
    }

    /// Generate a collision-free name for the desired path.
    pub fn generate_unique_name(&self, path: &Path) -> Result<String, OpsError> {
        self.root.ensure_contained(path)?;

        Ok(if path.is_dir() {
            naming::unique_directory_name(path)
        } else {
            naming::unique_file_name(path)
        })
    }

    /// List sub directories of a workspace path.
    pub fn list_directories(
        &self,
        path: &Path,
        recursive: bool,
    ) -> Result<Vec<DirectoryEntry>, OpsError> {
        enumerate::list_directories(&self.root, path, recursive)
    }

    /// List files under a workspace path.
    pub fn list_files(&self, path: &Path, recursive: bool) -> Result<Vec<FileEntry>, OpsError> {
        enumerate::list_files(&self.root, path, recursive, &self.metadata_file)
    }

    /// Whether an entry exists at a workspace path.
    pub fn exists(&self, path: &Path) -> Result<bool, OpsError> {
        enumerate::exists(&self.root, path)
    }

    /// Run a batch, rolling back the created destination entries on
    /// cancellation or error.
    async fn execute(
        &self,
        mut batch: CopyBatch,
        options: CopyOptions,
    ) -> Result<(bool, CopyBatch), OpsError> {
        batch.on_progress = options.on_progress;
        batch.on_conflict = options.on_conflict;

        match copy::run_batch(&mut batch, &options.cancel).await {
            Ok(true) => {
                if let Some(delay) = options.settle {
                    tokio::time::sleep(delay).await;
                }
                Ok((true, batch))
            }
            Ok(false) => {
                cleanup::rollback(&batch.created);
                Ok((false, batch))
            }
            Err(error) => {
                cleanup::rollback(&batch.created);
                Err(error)
            }
        }
    }
}
