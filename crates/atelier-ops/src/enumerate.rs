//! Directory and file enumeration under the workspace boundary.

use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use atelier_core::{DirectoryEntry, FileEntry, OpsError, WorkspaceRoot};

/// List sub directories of `path`.
///
/// Hidden directories are pruned whole, so children of a hidden ancestor
/// never appear. A missing path yields an empty list, not an error.
pub(crate) fn list_directories(
    root: &WorkspaceRoot,
    path: &Path,
    recursive: bool,
) -> Result<Vec<DirectoryEntry>, OpsError> {
    root.ensure_contained(path)?;

    if !path.exists() {
        return Ok(Vec::new());
    }

    Ok(walk_directories(path, recursive)
        .into_iter()
        .map(DirectoryEntry::new)
        .collect())
}

/// List files under `path`, excluding hidden entries and the reserved
/// metadata file.
pub(crate) fn list_files(
    root: &WorkspaceRoot,
    path: &Path,
    recursive: bool,
    metadata_file: &str,
) -> Result<Vec<FileEntry>, OpsError> {
    root.ensure_contained(path)?;

    if !path.exists() {
        return Ok(Vec::new());
    }

    Ok(walk_files(path, recursive, metadata_file)
        .into_iter()
        .map(|path| match std::fs::metadata(&path) {
            Ok(metadata) => FileEntry::from_metadata(path, &metadata),
            Err(_) => FileEntry::new(path, 0, None),
        })
        .collect())
}

/// Whether an entry exists at `path`.
pub(crate) fn exists(root: &WorkspaceRoot, path: &Path) -> Result<bool, OpsError> {
    root.ensure_contained(path)?;
    Ok(path.exists())
}

/// Walk visible sub directories without the containment check; import
/// feeds external trees through here.
pub(crate) fn walk_directories(path: &Path, recursive: bool) -> Vec<PathBuf> {
    walker(path, recursive)
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.path())
        .collect()
}

/// Walk visible files without the containment check.
pub(crate) fn walk_files(path: &Path, recursive: bool, metadata_file: &str) -> Vec<PathBuf> {
    walker(path, recursive)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .filter(|path| !is_metadata_file(path, metadata_file))
        .collect()
}

/// Whether a path names the engine's reserved metadata file.
pub(crate) fn is_metadata_file(path: &Path, metadata_file: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().eq_ignore_ascii_case(metadata_file))
        .unwrap_or(false)
}

fn walker(path: &Path, recursive: bool) -> impl Iterator<Item = jwalk::DirEntry<((), ())>> {
    WalkDir::new(path)
        .parallelism(Parallelism::Serial)
        .skip_hidden(true)
        .sort(true)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .into_iter()
        .filter_map(Result::ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("sub")).unwrap();
        fs::create_dir(root.join("sub/nested")).unwrap();
        fs::create_dir(root.join(".hidden")).unwrap();

        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub/b.txt"), "b").unwrap();
        fs::write(root.join("sub/nested/c.txt"), "c").unwrap();
        fs::write(root.join(".hidden/secret.txt"), "s").unwrap();
        fs::write(root.join(".atelier.json"), "{}").unwrap();

        temp
    }

    #[test]
    fn test_walk_skips_hidden_trees() {
        let temp = create_tree();

        let dirs = walk_directories(temp.path(), true);
        assert_eq!(dirs.len(), 2);
        assert!(dirs.iter().all(|d| !d.to_string_lossy().contains("hidden")));

        let files = walk_files(temp.path(), true, ".atelier.json");
        let names: Vec<String> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_walk_shallow() {
        let temp = create_tree();

        let dirs = walk_directories(temp.path(), false);
        assert_eq!(dirs.len(), 1);

        let files = walk_files(temp.path(), false, ".atelier.json");
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_metadata_file_excluded_by_any_case() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Project.Meta"), "{}").unwrap();
        fs::write(temp.path().join("data.bin"), "x").unwrap();

        let files = walk_files(temp.path(), true, "project.meta");
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("data.bin"));
    }
}
