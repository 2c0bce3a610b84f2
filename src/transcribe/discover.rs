use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// True when `file_name` ends with any of `extensions`, compared literally.
pub fn matches_extension(file_name: &str, extensions: &[String]) -> bool {
    extensions
        .iter()
        .any(|ext| !ext.is_empty() && file_name.ends_with(ext.as_str()))
}

/// Regular files, and symlinks whose target is a regular file.
fn is_file_or_link_to_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    match std::fs::metadata(entry.path()) {
        Ok(metadata) => metadata.is_file(),
        Err(e) => {
            tracing::warn!("Skipping broken link {}: {}", entry.path().display(), e);
            false
        }
    }
}

/// Recursively find every file under `root` whose name ends with one of
/// `extensions`.
///
/// Entries are visited depth-first, sorted by file name within each directory,
/// so the result is stable across runs. Symlinks to files are returned, but
/// symlinked directories are not descended into. Unreadable entries are logged
/// and skipped. The caller is expected to have checked that `root` is a
/// directory.
pub fn find_media_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let file_name = entry.file_name().to_string_lossy();
        if !matches_extension(&file_name, extensions) {
            continue;
        }
        if is_file_or_link_to_file(&entry) {
            found.push(entry.into_path());
        }
    }

    found
}
