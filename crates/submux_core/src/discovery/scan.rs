//! Locating subtitle directories under input roots.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Find every directory named `dir_name` under `root`, the root itself
/// included. The name comparison is ASCII case-insensitive so "Subs" and
/// "subs" both match; symlinks are followed.
pub fn find_subtitle_dirs(root: &Path, dir_name: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| name.eq_ignore_ascii_case(dir_name))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::tempdir;

    #[test]
    fn finds_nested_subtitle_dirs() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Show A/Subs")).unwrap();
        fs::create_dir_all(dir.path().join("Show B/Season 01/subs")).unwrap();
        fs::create_dir_all(dir.path().join("Show B/Season 01/Extras")).unwrap();

        let found = find_subtitle_dirs(dir.path(), "Subs");

        assert_eq!(found.len(), 2);
        assert!(found.contains(&dir.path().join("Show A/Subs")));
        assert!(found.contains(&dir.path().join("Show B/Season 01/subs")));
    }

    #[test]
    fn matches_the_root_itself() {
        let dir = tempdir().unwrap();
        let subs = dir.path().join("Subs");
        fs::create_dir(&subs).unwrap();

        let found = find_subtitle_dirs(&subs, "Subs");
        assert_eq!(found, vec![subs]);
    }

    #[test]
    fn ignores_matching_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Subs"), b"").unwrap();

        let found = find_subtitle_dirs(dir.path(), "Subs");
        assert!(found.is_empty());
    }
}
