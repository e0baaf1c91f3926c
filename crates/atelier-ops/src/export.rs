//! Export batch construction: a workspace subtree out to an external
//! destination.
//!
//! Unlike import, export does not reproduce the top-level source
//! directory's own name: the source's children land directly in the
//! destination. Callers relying on round-tripping must account for the
//! asymmetry.

use std::path::Path;

use crate::batch::CopyBatch;
use crate::enumerate;

/// Build the batch for an export.
pub(crate) fn build_batch(source: &Path, destination: &Path, metadata_file: &str) -> CopyBatch {
    let mut batch = CopyBatch::new(source.to_path_buf(), destination.to_path_buf());

    batch.directories = enumerate::walk_directories(source, true);
    batch.files = enumerate::walk_files(source, true, metadata_file);

    batch.seal();
    batch
}
