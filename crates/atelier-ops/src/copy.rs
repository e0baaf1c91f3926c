//! Sequential execution of a copy batch.

use std::fs;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use atelier_core::{OpsError, paths_equal_ci};

use crate::batch::CopyBatch;
use crate::conflict::{self, ConflictDecision};
use crate::naming::{unique_directory_name, unique_file_name};

/// Execute a copy batch, directories first (ancestors before descendants),
/// then files.
///
/// Returns `Ok(true)` when every item was processed, `Ok(false)` when the
/// operation was cancelled by the token or by a `Cancel` decision. Either
/// way the paths the batch created are recorded on it so the caller can
/// roll back.
pub(crate) async fn run_batch(
    batch: &mut CopyBatch,
    cancel: &CancellationToken,
) -> Result<bool, OpsError> {
    let directories = std::mem::take(&mut batch.directories);
    for source_dir in &directories {
        if cancel.is_cancelled() {
            return Ok(false);
        }

        // The batch root itself is never reproduced; only its contents are.
        if paths_equal_ci(source_dir, &batch.source_root) {
            continue;
        }

        let desired = map_destination(source_dir, batch);
        batch.current += 1;
        batch.report(source_dir, &desired);

        let target = ensure_directory(batch, &desired)?;
        batch.mapping.insert(source_dir.clone(), target.clone());
        batch.report(source_dir, &target);

        tokio::task::yield_now().await;
    }

    let files = std::mem::take(&mut batch.files);
    for source_file in &files {
        if cancel.is_cancelled() {
            return Ok(false);
        }

        let mut target = map_destination(source_file, batch);
        batch.current += 1;
        batch.report(source_file, &target);

        if target.exists() {
            let decision = if target.is_dir() {
                // A directory occupies the file's destination; overwrite is
                // structurally impossible, so rename without prompting.
                ConflictDecision::Rename
            } else {
                conflict::resolve(
                    &mut batch.decision,
                    batch.on_conflict.as_ref(),
                    source_file,
                    &target,
                )
            };

            match decision.collapse() {
                ConflictDecision::Overwrite => {}
                ConflictDecision::Rename => {
                    let parent = target.parent().unwrap_or(Path::new("")).to_path_buf();
                    target = parent.join(unique_file_name(&target));
                }
                ConflictDecision::Cancel => return Ok(false),
                _ => return Err(OpsError::ConflictUnresolved { path: target }),
            }
        }

        if !target.exists() {
            batch.created.push(target.clone());
        }
        copy_file(source_file, &target).await?;
        batch.report(source_file, &target);
    }

    Ok(true)
}

/// Remap a source path into the destination tree.
///
/// The parent's recorded mapping wins, so contents follow a directory that
/// had to be created under a generated unique name. Otherwise the common
/// source root is replaced by the destination prefix.
fn map_destination(source: &Path, batch: &CopyBatch) -> PathBuf {
    if let Some(parent) = source.parent() {
        if let Some(mapped) = batch.mapping.get(parent) {
            if let Some(name) = source.file_name() {
                return mapped.join(name);
            }
        }
    }

    match source.strip_prefix(&batch.source_root) {
        Ok(relative) => batch.destination.join(relative),
        Err(_) => batch
            .destination
            .join(source.file_name().unwrap_or_default()),
    }
}

/// Create the destination directory, falling back to generated sibling
/// names while an entry of the wrong kind occupies the desired path.
fn ensure_directory(batch: &mut CopyBatch, desired: &Path) -> Result<PathBuf, OpsError> {
    let mut target = desired.to_path_buf();

    if !target.exists() {
        if let Some(created_root) = first_missing_ancestor(&batch.destination, &target) {
            batch.created.push(created_root);
        }
        fs::create_dir_all(&target).map_err(|e| OpsError::io(&target, e))?;
    }

    while !target.is_dir() {
        let parent = target.parent().unwrap_or(Path::new("")).to_path_buf();
        target = parent.join(unique_directory_name(&target));
        if !target.exists() {
            batch.created.push(target.clone());
            fs::create_dir(&target).map_err(|e| OpsError::io(&target, e))?;
        }
    }

    Ok(target)
}

/// The first path component under `base` that does not exist yet; that is
/// the root of everything `create_dir_all` is about to make.
fn first_missing_ancestor(base: &Path, target: &Path) -> Option<PathBuf> {
    let relative = target.strip_prefix(base).ok()?;
    let mut probe = base.to_path_buf();
    for component in relative.components() {
        probe.push(component);
        if !probe.exists() {
            return Some(probe);
        }
    }
    None
}

/// Copy one file on the blocking pool.
async fn copy_file(source: &Path, destination: &Path) -> Result<u64, OpsError> {
    let source_owned = source.to_path_buf();
    let destination_owned = destination.to_path_buf();

    tokio::task::spawn_blocking(move || fs::copy(&source_owned, &destination_owned))
        .await
        .map_err(|e| OpsError::Io {
            path: destination.to_path_buf(),
            source: std::io::Error::other(e),
        })?
        .map_err(|e| OpsError::io(destination, e))
}
