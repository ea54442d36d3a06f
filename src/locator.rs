//! Recursive discovery of source files under a data root

use crate::error::{EtlError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find every file below `root` whose extension matches `extension`.
///
/// Paths are absolute and sorted so repeated runs visit files in the same
/// order. An empty directory yields an empty list; a root that does not
/// exist, is not a directory, or cannot be walked is a `Discovery` error.
pub fn find_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(EtlError::Discovery {
            path: root.to_path_buf(),
            reason: "path does not exist".to_string(),
        });
    }
    if !root.is_dir() {
        return Err(EtlError::Discovery {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let root = root.canonicalize().map_err(|e| EtlError::Discovery {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    let extension = extension.trim_start_matches('.');

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = entry.map_err(|e| EtlError::Discovery {
            path: e.path().unwrap_or(root.as_path()).to_path_buf(),
            reason: e.to_string(),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!("{} files with .{} under {}", files.len(), extension, root.display());
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
