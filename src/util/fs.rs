//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};

use crate::core::{BuildError, BuildResult};

/// Remove a directory and all its contents, if it exists.
///
/// Returns whether anything was removed.
pub fn remove_dir_all_if_exists(path: &Path) -> BuildResult<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(path)
        .map_err(|e| BuildError::io(format!("failed to remove directory: {}", path.display()), e))?;
    Ok(true)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> BuildResult<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            BuildError::io(format!("failed to create directory: {}", path.display()), e)
        })?;
    }
    Ok(())
}

/// Copy `src` into directory `dest_dir`, keeping the file name.
pub fn copy_into(src: &Path, dest_dir: &Path) -> BuildResult<PathBuf> {
    let name = src.file_name().ok_or_else(|| {
        BuildError::io(
            format!("not a file: {}", src.display()),
            std::io::Error::from(std::io::ErrorKind::InvalidInput),
        )
    })?;
    let dest = dest_dir.join(name);
    fs::copy(src, &dest).map_err(|e| {
        BuildError::io(
            format!("failed to copy {} to {}", src.display(), dest.display()),
            e,
        )
    })?;
    Ok(dest)
}

/// Files directly inside `dir` with the given extension, sorted.
///
/// Glob metacharacters in `dir` itself (`vosk-api[v0.3]`) match literally.
pub fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let base = Pattern::escape(&dir.to_string_lossy());
    let pattern_str = format!("{}/*.{}", base.trim_end_matches('/'), extension);

    let mut results = Vec::new();
    match glob(&pattern_str) {
        Ok(paths) => {
            for entry in paths {
                match entry {
                    Ok(path) if path.is_file() => results.push(path),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("glob error: {}", e),
                }
            }
        }
        Err(e) => tracing::warn!("invalid glob pattern {}: {}", pattern_str, e),
    }

    results.sort();
    results
}
