//! The in-flight record of one copy, import, or export invocation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::conflict::{ConflictDecision, ConflictHandler};
use crate::progress::ProgressHandler;

/// State owned exclusively by a single copy-family operation for its
/// lifetime.
///
/// Directories are held in ascending path-length order, which guarantees
/// that an ancestor is always processed before any of its descendants.
pub(crate) struct CopyBatch {
    /// Common root of the source items; stripped when remapping into the
    /// destination.
    pub(crate) source_root: PathBuf,
    /// Destination directory the batch copies into.
    pub(crate) destination: PathBuf,
    pub(crate) directories: Vec<PathBuf>,
    pub(crate) files: Vec<PathBuf>,
    /// Running item count, 1-based once processing starts.
    pub(crate) current: usize,
    pub(crate) total: usize,
    /// Sticky conflict state for the whole batch.
    pub(crate) decision: ConflictDecision,
    /// Source directory -> destination directory actually used, including
    /// unique renames made along the way.
    pub(crate) mapping: HashMap<PathBuf, PathBuf>,
    /// Destination paths this batch created, in creation order; consumed by
    /// rollback on cancellation or failure.
    pub(crate) created: Vec<PathBuf>,
    pub(crate) on_progress: Option<ProgressHandler>,
    pub(crate) on_conflict: Option<ConflictHandler>,
}

impl CopyBatch {
    pub(crate) fn new(source_root: PathBuf, destination: PathBuf) -> Self {
        Self {
            source_root,
            destination,
            directories: Vec::new(),
            files: Vec::new(),
            current: 0,
            total: 0,
            decision: ConflictDecision::Unresolved,
            mapping: HashMap::new(),
            created: Vec::new(),
            on_progress: None,
            on_conflict: None,
        }
    }

    /// Fix the processing order and the total item count.
    pub(crate) fn seal(&mut self) {
        sort_ascending_by_path_length(&mut self.directories);
        self.total = self.directories.len() + self.files.len();
    }

    /// Report progress for one item at the current counts.
    pub(crate) fn report(&self, source: &Path, destination: &Path) {
        if let Some(on_progress) = &self.on_progress {
            on_progress(source, destination, self.current, self.total);
        }
    }
}

/// Ancestors before descendants.
pub(crate) fn sort_ascending_by_path_length(paths: &mut [PathBuf]) {
    paths.sort_by_key(|path| path.as_os_str().len());
}

/// Deepest entries first.
pub(crate) fn sort_descending_by_path_length(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| b.as_os_str().len().cmp(&a.as_os_str().len()));
}
