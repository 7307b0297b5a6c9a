use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::report::{CleanupReport, RemovalResult};
use crate::common::errors::CleanupError;
use crate::common::safety;
use crate::manifest::Section;

/// Delete a single file, symlink or directory tree without following links
pub fn remove_path(path: &Path) -> Result<(), CleanupError> {
    let metadata = std::fs::symlink_metadata(path).map_err(|e| CleanupError::io(path, e))?;
    if metadata.is_dir() {
        std::fs::remove_dir_all(path).map_err(|e| CleanupError::io(path, e))
    } else {
        std::fs::remove_file(path).map_err(|e| CleanupError::io(path, e))
    }
}

/// Existence check that does not follow symlinks
fn path_present(path: &Path) -> bool {
    match std::fs::symlink_metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != ErrorKind::NotFound,
    }
}

/// Remove directories (or files given in their place), continuing past failures
pub fn erase_dirs<P: AsRef<Path>>(paths: &[P], section: Section, report: &mut CleanupReport) {
    for path in paths {
        let path: &Path = path.as_ref();
        if path.as_os_str().is_empty() {
            continue;
        }
        if !path_present(path) {
            tracing::info!("Path doesn't exist: {}", path.display());
            continue;
        }
        if safety::is_protected(path) {
            tracing::warn!("Refusing to remove protected path: {}", path.display());
            report.record(
                section,
                path.display().to_string(),
                RemovalResult::failure("protected system path"),
            );
            continue;
        }

        if !path.is_dir() {
            tracing::info!("{} is a file and not a directory, deleting file", path.display());
        }
        let result = match remove_path(path) {
            Ok(()) => {
                tracing::debug!("Removed {}", path.display());
                RemovalResult::Success
            }
            Err(e) => {
                tracing::warn!("Failed to remove dir: {}, error: {}", path.display(), e);
                RemovalResult::failure(e.to_string())
            }
        };
        report.record(section, path.display().to_string(), result);
    }
}

/// Remove plain files, continuing past failures
pub fn erase_files<P: AsRef<Path>>(paths: &[P], section: Section, report: &mut CleanupReport) {
    for path in paths {
        let path: &Path = path.as_ref();
        if path.as_os_str().is_empty() {
            continue;
        }
        if !path_present(path) {
            tracing::info!("File doesn't exist: {}", path.display());
            continue;
        }
        let result = match std::fs::remove_file(path) {
            Ok(()) => RemovalResult::Success,
            Err(e) => {
                tracing::warn!("Failed to delete file: {}, error: {}", path.display(), e);
                RemovalResult::failure(e.to_string())
            }
        };
        report.record(section, path.display().to_string(), result);
    }
}

/// Regular files directly inside `dir` (no symlinks, no directories), sorted.
///
/// With a mask, only files whose name matches the glob are returned.
pub fn list_files(dir: &Path, mask: Option<&glob::Pattern>) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!("Cannot list {}: {}", dir.display(), e);
            }
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|e| match mask {
            Some(pattern) => pattern.matches(&e.file_name().to_string_lossy()),
            None => true,
        })
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

/// Remove every entry directly under `folders` owned by one of `uids`
pub fn delete_by_owner<P: AsRef<Path>>(
    uids: &[u32],
    folders: &[P],
    section: Section,
    report: &mut CleanupReport,
) {
    if uids.is_empty() {
        return;
    }
    for folder in folders {
        let owned = owned_entries(folder.as_ref(), uids);
        for path in &owned {
            tracing::info!("Deleting file/folder: {}", path.display());
        }
        erase_dirs(&owned, section, report);
    }
}

#[cfg(unix)]
fn owned_entries(folder: &Path, uids: &[u32]) -> Vec<PathBuf> {
    use std::os::unix::fs::MetadataExt;

    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot list {}: {}", folder.display(), e);
            return Vec::new();
        }
    };

    let mut owned = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        match std::fs::symlink_metadata(&path) {
            Ok(meta) if uids.contains(&meta.uid()) => owned.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("Cannot stat {}: {}", path.display(), e),
        }
    }
    owned.sort();
    owned
}

#[cfg(not(unix))]
fn owned_entries(_folder: &Path, _uids: &[u32]) -> Vec<PathBuf> {
    Vec::new()
}
