use std::path::{Path, PathBuf};

use atelier_core::{
    DEFAULT_METADATA_FILE, DirectoryEntry, FileEntry, OpsError, WorkspaceConfig, WorkspaceRoot,
    is_hidden_name, normalize_lexically, paths_equal_ci,
};

#[test]
fn test_workspace_root_containment() {
    let root = WorkspaceRoot::new("/projects/game").unwrap();

    assert!(root.contains(Path::new("/projects/game")));
    assert!(root.contains(Path::new("/projects/game/assets/tex.png")));
    assert!(root.contains(Path::new("/Projects/Game/ASSETS")));

    assert!(!root.contains(Path::new("/projects")));
    assert!(!root.contains(Path::new("/projects/game-backup")));
    assert!(!root.contains(Path::new("/projects/game/../other")));
}

#[test]
fn test_ensure_contained_error_carries_both_paths() {
    let root = WorkspaceRoot::new("/projects/game").unwrap();
    let err = root.ensure_contained(Path::new("/tmp/elsewhere")).unwrap_err();

    match err {
        OpsError::OutsideWorkspace { path, root } => {
            assert_eq!(path, PathBuf::from("/tmp/elsewhere"));
            assert_eq!(root, PathBuf::from("/projects/game"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_relative_roots_are_rejected() {
    assert!(matches!(
        WorkspaceRoot::new("game"),
        Err(OpsError::InvalidRoot { .. })
    ));
}

#[test]
fn test_path_helpers() {
    assert_eq!(
        normalize_lexically(Path::new("/a/b/./../c")),
        PathBuf::from("/a/c")
    );
    assert!(paths_equal_ci(Path::new("/A/B"), Path::new("/a/b")));
    assert!(!paths_equal_ci(Path::new("/a/b"), Path::new("/a/b/c")));
}

#[test]
fn test_entries() {
    let file = FileEntry::new("/ws/docs/readme.md", 42, None);
    assert_eq!(file.name(), "readme.md");
    assert_eq!(file.size, 42);

    let dir = DirectoryEntry::new("/ws/docs");
    assert_eq!(dir.name(), "docs");

    assert!(is_hidden_name(std::ffi::OsStr::new(".cache")));
    assert!(!is_hidden_name(std::ffi::OsStr::new("cache")));
}

#[test]
fn test_config_round_trip() {
    let config = WorkspaceConfig::builder()
        .root("/ws/project")
        .build()
        .unwrap();
    assert_eq!(config.metadata_file, DEFAULT_METADATA_FILE);

    let json = serde_json::to_string(&config).unwrap();
    let back: WorkspaceConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.root, config.root);
    assert_eq!(back.metadata_file, config.metadata_file);
}
