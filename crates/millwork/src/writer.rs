//! Artifact writing: output directory creation, traversal-safe target
//! resolution, and atomic temp-file + rename writes.
//!
//! Writes are two-phase so a half-written artifact is never observable: all
//! content lands in `.tmp` siblings first, then every temp file is renamed
//! into place. A failure during either phase deletes the temps; artifacts
//! from earlier, completed invocations are never touched.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::{Error, Result};

/// Resolve `dest/filename` for a combined artifact, rejecting filenames that
/// would escape the destination directory.
pub(crate) fn locate_concat_target(dest: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "output filename contains a null byte".to_string(),
        ));
    }

    let dir = absolutize(dest)?;
    let full = dir.join(Path::new(filename).clean()).clean();
    if !full.starts_with(&dir) {
        return Err(Error::InvalidOutputPath(format!(
            "'{}' escapes destination directory '{}'",
            filename,
            dest.display()
        )));
    }

    Ok(dest.join(Path::new(filename).clean()))
}

fn absolutize(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.to_path_buf().clean();
    if cleaned.is_absolute() {
        return Ok(cleaned);
    }
    let cwd = std::env::current_dir()
        .map_err(|e| Error::InvalidOutputPath(format!("failed to get current directory: {e}")))?;
    Ok(cwd.join(cleaned).clean())
}

/// Write one artifact, plus its source map when given, creating parent
/// directories as needed. JS callers pass `Some(map)` and get a trailing
/// `sourceMappingURL` comment pointing at the `<artifact>.map` sibling.
pub(crate) fn write_artifact(path: &Path, code: &str, map: Option<&str>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::WriteFailure(format!(
                "failed to create output directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut operations: Vec<(PathBuf, String)> = Vec::with_capacity(2);
    match map {
        Some(map) => {
            let map_path = map_path_for(path);
            let map_name = map_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            operations.push((path.to_path_buf(), format!("{code}\n//# sourceMappingURL={map_name}\n")));
            operations.push((map_path, map.to_string()));
        }
        None => operations.push((path.to_path_buf(), code.to_string())),
    }

    write_files_atomic(&operations)
}

/// Companion map path: the artifact filename with `.map` appended, so
/// `app.min.js` maps to `app.min.js.map`.
pub(crate) fn map_path_for(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(".map");
    artifact.with_file_name(name)
}

fn write_files_atomic(operations: &[(PathBuf, String)]) -> Result<()> {
    let mut temp_files = Vec::with_capacity(operations.len());

    for (target, contents) in operations {
        let temp = target.with_extension("tmp");
        if let Err(e) = fs::write(&temp, contents) {
            cleanup_temp_files(&temp_files);
            return Err(Error::WriteFailure(format!(
                "failed to write temporary file '{}': {}",
                temp.display(),
                e
            )));
        }
        temp_files.push((temp, target.clone()));
    }

    for (temp, target) in &temp_files {
        if let Err(e) = fs::rename(temp, target) {
            cleanup_temp_files(&temp_files);
            return Err(Error::WriteFailure(format!(
                "failed to rename '{}' to '{}': {}",
                temp.display(),
                target.display(),
                e
            )));
        }
    }

    Ok(())
}

fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp, _) in temp_files {
        if temp.exists() {
            if let Err(e) = fs::remove_file(temp) {
                tracing::warn!("failed to clean up temporary file '{}': {}", temp.display(), e);
            }
        }
    }
}
