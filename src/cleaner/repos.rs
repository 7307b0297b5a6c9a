use std::path::{Path, PathBuf};

use super::remover;

/// Repository files that belong to the agent itself and are never removed
pub const REPOSITORY_BLACK_LIST: &[&str] = &["ambari.repo"];

fn is_blacklisted(path: &Path) -> bool {
    path.file_name()
        .map(|name| REPOSITORY_BLACK_LIST.iter().any(|b| name == *b))
        .unwrap_or(false)
}

/// Lines that identify a repository definition by name
fn repo_markers(repo_names: &[String]) -> Vec<String> {
    repo_names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .flat_map(|name| [format!("[{}]", name), format!("name={}", name)])
        .collect()
}

/// Whether any line of a repo file declares one of the markers
pub fn declares_repo(content: &str, markers: &[String]) -> bool {
    content
        .lines()
        .map(str::trim)
        .any(|line| markers.iter().any(|m| m == line))
}

/// Repo definition files in `repo_dir` that declare any of `repo_names`
pub fn find_repo_files(repo_names: &[String], repo_dir: &Path) -> Vec<PathBuf> {
    let markers = repo_markers(repo_names);
    if markers.is_empty() {
        return Vec::new();
    }

    let mut selected = Vec::new();
    for path in remover::list_files(repo_dir, None) {
        if is_blacklisted(&path) {
            tracing::debug!("Skipping protected repo file: {}", path.display());
            continue;
        }
        // Repo files are not guaranteed to be UTF-8; match on the lossy text
        match std::fs::read(&path) {
            Ok(bytes) if declares_repo(&String::from_utf8_lossy(&bytes), &markers) => {
                selected.push(path)
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Cannot read repo file {}: {}", path.display(), e),
        }
    }
    selected
}
