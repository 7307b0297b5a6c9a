use super::errors::CleanupError;

/// Check whether the current process runs with effective root privilege.
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Fail before any destructive action unless running as root
pub fn require_root() -> Result<(), CleanupError> {
    if is_root() {
        Ok(())
    } else {
        Err(CleanupError::NotRoot)
    }
}
