use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use super::errors::CleanupError;

/// Timestamp suffix used for log backups
const BACKUP_SUFFIX_FORMAT: &str = "%Y%m%d%H%M%S";

/// Copy an existing file to `<file>.<timestamp>` before it gets overwritten.
///
/// Returns the backup path when a copy was made, None when there was
/// nothing to back up. Runs before logging is installed, so the caller
/// reports a failure once the subscriber is up.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>, CleanupError> {
    if !path.exists() {
        return Ok(None);
    }

    let stamp = Local::now().format(BACKUP_SUFFIX_FORMAT).to_string();
    let mut backup = path.as_os_str().to_owned();
    backup.push(".");
    backup.push(&stamp);
    let backup = PathBuf::from(backup);

    std::fs::copy(path, &backup).map_err(|e| CleanupError::io(path, e))?;
    Ok(Some(backup))
}

/// Install the global subscriber: stderr plus the output log file.
///
/// The returned guard flushes the file writer on drop and must be held
/// for the whole run.
pub fn init_logging(output_file: &Path, verbose: bool) -> Result<WorkerGuard> {
    if let Some(dir) = output_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log dir: {}", dir.display()))?;
    }
    let file = std::fs::File::create(output_file)
        .with_context(|| format!("Failed to open log file: {}", output_file.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}
