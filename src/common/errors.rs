use std::path::PathBuf;

use thiserror::Error;

/// Typed errors for host cleanup operations.
/// `anyhow` is used at the top level for CLI error handling,
/// but these typed errors let modules be precise about failures.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The process lacks root privilege
    #[error("host cleanup needs to be run as root")]
    NotRoot,

    /// File system operation failed
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest text is not valid INI
    #[error("manifest parse error on line {line}: {message}")]
    ManifestParse { line: usize, message: String },

    /// External command could not be started
    #[error("failed to run '{program}': {source}")]
    Command {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl CleanupError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanupError::Io {
            path: path.into(),
            source,
        }
    }
}
