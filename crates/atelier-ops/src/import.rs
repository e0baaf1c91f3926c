//! Import batch construction: external file trees into a workspace
//! directory.
//!
//! Import keeps each top-level directory's own name under the destination;
//! export is the strategy that flattens (see `export.rs`). The two are
//! deliberately separate builders rather than one routine with a flag.

use std::path::{Path, PathBuf};

use atelier_core::{OpsError, is_hidden_name};

use crate::batch::CopyBatch;
use crate::enumerate;

/// Derive the implicit common root of an arbitrary import set: the parent
/// of the shortest non-empty entry.
///
/// The sources need not share a single tree; the common root only anchors
/// path remapping for the entries that do.
pub(crate) fn common_root(sources: &[PathBuf]) -> Result<PathBuf, OpsError> {
    sources
        .iter()
        .filter(|path| !path.as_os_str().is_empty())
        .min_by_key(|path| path.as_os_str().len())
        .and_then(|shortest| shortest.parent())
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or(OpsError::NoCommonRoot)
}

/// Build the batch for an import.
///
/// Hidden entries and the reserved metadata file are dropped even when
/// named explicitly; entries that do not exist are skipped.
pub(crate) fn build_batch(
    sources: &[PathBuf],
    destination: &Path,
    metadata_file: &str,
) -> Result<CopyBatch, OpsError> {
    let mut batch = CopyBatch::new(common_root(sources)?, destination.to_path_buf());

    let mut ordered: Vec<&PathBuf> = sources
        .iter()
        .filter(|path| !path.as_os_str().is_empty())
        .collect();
    ordered.sort_by_key(|path| path.as_os_str().len());

    for source in ordered {
        let Some(name) = source.file_name() else {
            continue;
        };
        if is_hidden_name(name) || enumerate::is_metadata_file(source, metadata_file) {
            continue;
        }

        if source.is_dir() {
            batch.directories.push(source.clone());
            batch
                .directories
                .extend(enumerate::walk_directories(source, true));
            batch
                .files
                .extend(enumerate::walk_files(source, true, metadata_file));
        } else if source.is_file() {
            batch.files.push(source.clone());
        }
    }

    batch.seal();
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_root_is_parent_of_shortest() {
        let sources = vec![
            PathBuf::from("/ext/things/deep/file.txt"),
            PathBuf::from("/ext/other"),
        ];
        assert_eq!(common_root(&sources).unwrap(), PathBuf::from("/ext"));
    }

    #[test]
    fn test_common_root_ignores_empty_entries() {
        let sources = vec![PathBuf::new(), PathBuf::from("/ext/dir")];
        assert_eq!(common_root(&sources).unwrap(), PathBuf::from("/ext"));
    }

    #[test]
    fn test_common_root_fails_on_all_blank() {
        let sources = vec![PathBuf::new(), PathBuf::new()];
        assert!(matches!(common_root(&sources), Err(OpsError::NoCommonRoot)));
    }
}
