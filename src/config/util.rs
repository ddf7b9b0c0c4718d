//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`.
///
/// Absolute names are returned as-is when they exist.
///
/// ```text
/// /home/user/blog/Posts/2024/   ← start
/// /home/user/blog/marka.toml    ← found
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("Posts/2024");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("marka.toml"), "").unwrap();

        let found = find_config_file(Path::new("marka.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("marka.toml"));
    }

    #[test]
    fn test_missing_absolute() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(find_config_file(&missing, dir.path()).is_none());
    }
}
