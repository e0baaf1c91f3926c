//! Unique-name generation and name validation.

use std::path::Path;

use atelier_core::OpsError;

/// Generate a file name that does not collide at the desired path.
///
/// Appends " (N)" (N starting at 1) before the extension until no entry of
/// any kind occupies the candidate path. Returns the original name
/// unchanged when the path is free.
pub fn unique_file_name(path: &Path) -> String {
    if !path.exists() {
        return leaf_name(path);
    }

    let parent = path.parent().unwrap_or(Path::new(""));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let extension = path.extension().and_then(|e| e.to_str());

    let mut count = 0u32;
    loop {
        count += 1;
        let candidate = match extension {
            Some(ext) => format!("{stem} ({count}).{ext}"),
            None => format!("{stem} ({count})"),
        };
        if !parent.join(&candidate).exists() {
            return candidate;
        }
    }
}

/// Generate a directory name that does not collide at the desired path.
///
/// Appends " (N)" at the end of the name. A path occupied by an entry of
/// the wrong kind (a file where a directory is wanted) counts as a
/// collision.
pub fn unique_directory_name(path: &Path) -> String {
    if !path.exists() {
        return leaf_name(path);
    }

    let parent = path.parent().unwrap_or(Path::new(""));
    let name = leaf_name(path);

    let mut count = 0u32;
    loop {
        count += 1;
        let candidate = format!("{name} ({count})");
        if !parent.join(&candidate).exists() {
            return candidate;
        }
    }
}

/// Validate a file or directory leaf name for cross-platform use.
pub fn validate_filename(name: &str) -> Result<(), OpsError> {
    if name.is_empty() {
        return Err(OpsError::invalid_name(name, "name cannot be empty"));
    }

    if name.len() > 255 {
        return Err(OpsError::invalid_name(
            name,
            "name is too long (max 255 characters)",
        ));
    }

    for c in ['/', '\0'] {
        if name.contains(c) {
            return Err(OpsError::invalid_name(
                name,
                format!("name cannot contain '{}'", c.escape_default()),
            ));
        }
    }

    // Additional Windows restrictions (enforced everywhere for portability
    // of workspace trees).
    #[cfg(target_os = "windows")]
    {
        for c in ['\\', ':', '*', '?', '"', '<', '>', '|'] {
            if name.contains(c) {
                return Err(OpsError::invalid_name(
                    name,
                    format!("name cannot contain '{c}'"),
                ));
            }
        }
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err(OpsError::invalid_name(
            name,
            "name cannot start or end with spaces",
        ));
    }

    if name.ends_with('.') {
        return Err(OpsError::invalid_name(name, "name cannot end with a dot"));
    }

    if name == "." || name == ".." {
        return Err(OpsError::invalid_name(name, "'.' and '..' are reserved"));
    }

    Ok(())
}

fn leaf_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unique_file_name_free_path() {
        let temp = TempDir::new().unwrap();
        let desired = temp.path().join("notes.txt");
        assert_eq!(unique_file_name(&desired), "notes.txt");
    }

    #[test]
    fn test_unique_file_name_counts_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "a").unwrap();
        fs::write(temp.path().join("notes (1).txt"), "b").unwrap();

        let desired = temp.path().join("notes.txt");
        assert_eq!(unique_file_name(&desired), "notes (2).txt");
    }

    #[test]
    fn test_unique_file_name_no_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Makefile"), "all:").unwrap();

        let desired = temp.path().join("Makefile");
        assert_eq!(unique_file_name(&desired), "Makefile (1)");
    }

    #[test]
    fn test_unique_directory_name_wrong_kind_counts() {
        let temp = TempDir::new().unwrap();
        // A file occupies the desired directory path.
        fs::write(temp.path().join("assets"), "not a dir").unwrap();
        fs::create_dir(temp.path().join("assets (1)")).unwrap();

        let desired = temp.path().join("assets");
        assert_eq!(unique_directory_name(&desired), "assets (2)");
    }

    #[test]
    fn test_validate_filename_valid() {
        assert!(validate_filename("test.txt").is_ok());
        assert!(validate_filename("my-file").is_ok());
        assert!(validate_filename(".hidden").is_ok());
        assert!(validate_filename("file with spaces").is_ok());
    }

    #[test]
    fn test_validate_filename_invalid() {
        assert!(validate_filename("").is_err());
        assert!(validate_filename("test/file").is_err());
        assert!(validate_filename(".").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("file ").is_err());
        assert!(validate_filename(" file").is_err());
        assert!(validate_filename("file.").is_err());
    }
}
