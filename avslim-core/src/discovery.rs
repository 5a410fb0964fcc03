//! File discovery for finding media files to process.
//!
//! Scans the input directory (optionally recursively) for regular files
//! whose extension matches the recognized set. Recursive scans exclude the
//! output directory so already-produced files are never rediscovered.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Finds media files under `root` whose extension (case-insensitive, no dot)
/// is in `extensions`. Flat mode looks only at the top level; recursive mode
/// descends into child directories, skipping `exclude` entirely.
///
/// No ordering is guaranteed; callers impose their own.
pub fn find_media_files(
    root: &Path,
    extensions: &[&str],
    recursive: bool,
    exclude: Option<&Path>,
) -> CoreResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CoreError::InvalidInputPath(format!(
            "'{}' is not a directory",
            root.display()
        )));
    }

    let mut found = Vec::new();
    collect(root, extensions, recursive, exclude, &mut found)?;
    Ok(found)
}

fn collect(
    dir: &Path,
    extensions: &[&str],
    recursive: bool,
    exclude: Option<&Path>,
    found: &mut Vec<PathBuf>,
) -> CoreResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(excluded) = exclude {
            if path == excluded {
                continue;
            }
        }
        if path.is_dir() {
            if recursive {
                collect(&path, extensions, recursive, exclude, found)?;
            }
        } else if path.is_file() && matches_extension(&path, extensions) {
            found.push(path);
        }
    }
    Ok(())
}

fn matches_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
