//! Core types for the atelier workspace engine.
//!
//! This crate provides the fundamental data structures shared by the
//! operation engines: the workspace root and its containment boundary,
//! file and directory entry records, configuration, and the error type.

mod config;
mod entry;
mod error;
mod workspace;

pub use config::{DEFAULT_METADATA_FILE, WorkspaceConfig, WorkspaceConfigBuilder};
pub use entry::{DirectoryEntry, FileEntry, is_hidden_name};
pub use error::OpsError;
pub use workspace::{WorkspaceRoot, normalize_lexically, paths_equal_ci};
