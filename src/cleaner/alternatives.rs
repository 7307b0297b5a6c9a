//! Removal of alternatives-mechanism registrations.
//!
//! Each alternative is a stack of symlinks registered under one name. The
//! registered paths are read back from `--display` output, where every
//! candidate appears on a line like
//! `/usr/hdp/2.6/hadoop/conf - priority 10`, and each is removed with
//! `--remove <name> <path>`.

use super::remover;
use super::report::{CleanupReport, RemovalResult};
use crate::manifest::{AlternativesSpec, Section};
use crate::system::{CommandRunner, CommandSpec, OsFamily};

/// Candidate paths listed in `--display` output
pub fn registered_paths(display_output: &str) -> Vec<String> {
    display_output
        .lines()
        .filter(|line| line.contains("priority"))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Query the registered paths for one alternative, None if the query failed
fn describe(runner: &dyn CommandRunner, binary: &str, name: &str) -> Option<String> {
    let command = CommandSpec::new(binary, ["--display", name]);
    match runner.run(&command) {
        Ok(output) => {
            tracing::debug!("{} --display {}, out = {}", binary, name, output.stdout);
            Some(output.stdout)
        }
        Err(e) => {
            tracing::warn!("Cannot process alternative named: {}, error: {}", name, e);
            None
        }
    }
}

/// Remove every registered path of each named alternative, then erase the
/// configuration directories listed alongside
pub fn erase_alternatives(
    spec: &AlternativesSpec,
    os_family: &OsFamily,
    runner: &dyn CommandRunner,
    report: &mut CleanupReport,
) {
    let binary = os_family.alternatives_binary();

    for name in spec.symlink_list.iter().flatten().filter(|n| !n.is_empty()) {
        let paths = describe(runner, binary, name)
            .map(|out| registered_paths(&out))
            .unwrap_or_default();
        if paths.is_empty() {
            tracing::warn!("No alternatives found for: {}", name);
            continue;
        }

        for path in paths {
            tracing::debug!("Erasing alternative named: {}, path: {}", name, path);
            let command = CommandSpec::new(binary, ["--remove", name.as_str(), path.as_str()]);
            let result = match runner.run(&command) {
                Ok(out) if out.success() => RemovalResult::Success,
                Ok(out) => {
                    tracing::warn!(
                        "Failed to remove alternative: {}, path: {}, error: {}",
                        name,
                        path,
                        out.stderr.trim()
                    );
                    RemovalResult::failure(out.stderr.trim().to_string())
                }
                Err(e) => {
                    tracing::warn!("Failed to remove alternative: {}, path: {}, error: {}", name, path, e);
                    RemovalResult::failure(e.to_string())
                }
            };
            report.record(Section::Alternatives, format!("{} {}", name, path), result);
        }
    }

    if let Some(dirs) = &spec.target_list {
        remover::erase_dirs(dirs, Section::Alternatives, report);
    }
}
