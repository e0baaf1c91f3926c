//! Engine configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default name of the file reserved for the engine's own project metadata.
///
/// The reserved file is never enumerated, copied, or deleted.
pub const DEFAULT_METADATA_FILE: &str = ".atelier.json";

/// Configuration for a workspace engine instance.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WorkspaceConfig {
    /// Root directory of the sandboxed workspace.
    pub root: PathBuf,

    /// Name of the reserved metadata file.
    #[builder(default = "DEFAULT_METADATA_FILE.to_string()")]
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
}

fn default_metadata_file() -> String {
    DEFAULT_METADATA_FILE.to_string()
}

impl WorkspaceConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.root {
            Some(root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(root) if !root.is_absolute() => Err("Root path must be absolute".to_string()),
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl WorkspaceConfig {
    /// Create a new config builder.
    pub fn builder() -> WorkspaceConfigBuilder {
        WorkspaceConfigBuilder::default()
    }

    /// Create a simple config with the default metadata file name.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WorkspaceConfig::builder()
            .root("/ws/project")
            .metadata_file(".project.meta")
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/ws/project"));
        assert_eq!(config.metadata_file, ".project.meta");
    }

    #[test]
    fn test_config_defaults() {
        let config = WorkspaceConfig::builder().root("/ws/project").build().unwrap();
        assert_eq!(config.metadata_file, DEFAULT_METADATA_FILE);

        let config = WorkspaceConfig::new("/ws/project");
        assert_eq!(config.metadata_file, DEFAULT_METADATA_FILE);
    }

    #[test]
    fn test_config_rejects_bad_roots() {
        assert!(WorkspaceConfig::builder().build().is_err());
        assert!(WorkspaceConfig::builder().root("").build().is_err());
        assert!(WorkspaceConfig::builder().root("relative").build().is_err());
    }
}
