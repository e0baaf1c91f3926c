//! Callback types for progress reporting.

use std::path::Path;

/// Callback invoked before and after each item of a copy-family batch.
///
/// Arguments: the item's source path, its destination path, the running
/// item count (1-based), and the total item count.
pub type ProgressHandler = Box<dyn Fn(&Path, &Path, usize, usize) + Send + Sync>;

/// Callback invoked for each entry a delete operation is about to remove.
pub type DeleteObserver = Box<dyn Fn(&Path) + Send + Sync>;
