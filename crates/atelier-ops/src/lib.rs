//! File-operations engine for the atelier workspace.
//!
//! This crate performs bulk copy, import, export, move/rename, and
//! recursive soft-delete inside a sandboxed root directory, with per-file
//! conflict resolution, progress reporting, and cooperative cancellation.
//! Every public operation re-validates containment before touching the
//! file system.

mod batch;
mod cleanup;
mod conflict;
mod copy;
mod delete;
mod enumerate;
mod export;
mod import;
mod move_op;
mod naming;
mod progress;
mod service;

pub use cleanup::{CleanupOutcome, cleanup_directory};
pub use conflict::{ConflictDecision, ConflictHandler};
pub use delete::{SoftDelete, SystemTrash};
pub use naming::{unique_directory_name, unique_file_name, validate_filename};
pub use progress::{DeleteObserver, ProgressHandler};
pub use service::{CopyOptions, WorkspaceService};
