use std::path::{Component, Path, PathBuf};

/// Paths that must NEVER be deleted, whatever the manifest says.
/// A manifest is produced by another host check and can carry bad entries.
const PROTECTED_PATHS: &[&str] = &[
    "/",
    "/bin",
    "/boot",
    "/dev",
    "/etc",
    "/home",
    "/lib",
    "/lib64",
    "/opt",
    "/proc",
    "/root",
    "/sbin",
    "/sys",
    "/tmp",
    "/usr",
    "/var",
];

/// Check if a path is protected and should NEVER be deleted.
///
/// Comparison is on path components, so repeated separators and `.`
/// segments do not hide a protected directory. Any `..` segment is refused.
pub fn is_protected(path: &Path) -> bool {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => return true,
            Component::CurDir => {}
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        return true;
    }

    PROTECTED_PATHS
        .iter()
        .any(|p| normalized.as_path() == Path::new(p))
}
