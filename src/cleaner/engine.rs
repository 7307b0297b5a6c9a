use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::alternatives;
use super::remover;
use super::repos;
use super::report::{CleanupReport, RemovalResult};
use crate::common::config::HostLayout;
use crate::common::format::format_list;
use crate::manifest::{AlternativesSpec, CleanupManifest, Section, SkipSet};
use crate::system::{CommandRunner, CommandSpec, OsFamily, UserResolver};

/// Group shared by the service accounts; removed once after the users
pub const HADOOP_GROUP: &str = "hadoop";

/// The agent's own packages, never removed even when listed
pub const PACKAGES_BLACK_LIST: &[&str] = &["ambari-server", "ambari-agent"];

/// Items of a section worth acting on: present, and not all blank
fn active(list: Option<&[String]>) -> Option<&[String]> {
    list.filter(|items| items.iter().any(|i| !i.is_empty()))
}

fn alternatives_active(spec: Option<&AlternativesSpec>) -> Option<&AlternativesSpec> {
    spec.filter(|alt| {
        [&alt.symlink_list, &alt.target_list]
            .into_iter()
            .flatten()
            .flatten()
            .any(|i| !i.is_empty())
    })
}

/// Runs the removal steps for one manifest against one host.
///
/// Every OS mutation goes through `runner`, and user lookups through
/// `users`, so the whole sequence can be driven by fakes in tests.
pub struct HostCleanup<'a> {
    runner: &'a dyn CommandRunner,
    users: &'a dyn UserResolver,
    os_family: OsFamily,
    layout: HostLayout,
}

impl<'a> HostCleanup<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        users: &'a dyn UserResolver,
        os_family: OsFamily,
        layout: HostLayout,
    ) -> Self {
        Self {
            runner,
            users,
            os_family,
            layout,
        }
    }

    /// Execute every applicable step in order, continuing past failures
    pub fn run(&self, manifest: &CleanupManifest, skip: &SkipSet) -> CleanupReport {
        let mut report = CleanupReport::new();
        self.run_into(manifest, skip, &mut report);
        report.finish();
        report
    }

    /// Same as [`run`](Self::run) but appends to an existing report
    pub fn run_into(&self, manifest: &CleanupManifest, skip: &SkipSet, report: &mut CleanupReport) {
        let wanted = |section: Section| {
            if skip.contains(section) {
                None
            } else {
                active(manifest.list(section))
            }
        };

        let packages = wanted(Section::Packages);
        let processes = wanted(Section::Processes);
        let users = wanted(Section::Users);
        let home_dirs = wanted(Section::UsrHomedir);
        let directories = wanted(Section::Directories);
        let repositories = wanted(Section::Repositories);
        let alt = if skip.contains(Section::Alternatives) {
            None
        } else {
            alternatives_active(manifest.alternatives.as_ref())
        };

        // Discovered before anything is removed
        let additional_dirs = if skip.contains(Section::AdditionalDirectories) {
            Vec::new()
        } else {
            self.find_additional_dirs()
        };

        // Resolved while the accounts still exist
        let user_ids = users
            .map(|u| self.users.resolve_uids(u))
            .unwrap_or_default();

        if let Some(pids) = processes {
            tracing::info!("Killing pid's: {}", format_list(pids));
            self.kill_processes(pids, report);
        }

        if let Some(packages) = packages {
            tracing::info!("Deleting packages: {}", format_list(packages));
            if self.erase_packages(packages, report) {
                // Removed packages mean version selection has to run again
                self.remove_select_marker(report);
            }
        }

        if let Some(users) = users {
            tracing::info!("Deleting users: {}", format_list(users));
            self.delete_users(users, report);
            if let Some(home_dirs) = home_dirs {
                remover::erase_dirs(home_dirs, Section::UsrHomedir, report);
            }
            remover::delete_by_owner(&user_ids, &self.layout.owned_file_folders, Section::Users, report);
        }

        if let Some(dirs) = directories {
            tracing::info!("Deleting directories: {}", format_list(dirs));
            remover::erase_dirs(dirs, Section::Directories, report);
        }

        if !additional_dirs.is_empty() {
            let names: Vec<String> = additional_dirs.iter().map(|p| p.display().to_string()).collect();
            tracing::info!("Deleting additional directories: {}", format_list(&names));
            remover::erase_dirs(&additional_dirs, Section::AdditionalDirectories, report);
        }

        if let Some(repos) = repositories {
            let files = self.find_repo_files(repos);
            let names: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
            tracing::info!("Deleting repo files: {}", format_list(&names));
            remover::erase_files(&files, Section::Repositories, report);
        }

        if let Some(alt) = alt {
            tracing::info!("Erasing alternatives: {:?}", alt);
            alternatives::erase_alternatives(alt, &self.os_family, self.runner, report);
        }
    }

    /// Send SIGKILL to every listed pid
    pub fn kill_processes(&self, pids: &[String], report: &mut CleanupReport) {
        for pid in pids.iter().filter(|p| !p.is_empty()) {
            let command = CommandSpec::new("kill", ["-9", pid.as_str()]);
            let result = match self.runner.run(&command) {
                Ok(out) if out.success() => RemovalResult::Success,
                Ok(out) => {
                    tracing::error!("Unable to kill process with pid: {}, {}", pid, out.stderr.trim());
                    RemovalResult::failure(out.stderr.trim().to_string())
                }
                Err(e) => {
                    tracing::error!("Unable to kill process with pid: {}, {}", pid, e);
                    RemovalResult::failure(e.to_string())
                }
            };
            report.record(Section::Processes, pid.clone(), result);
        }
    }

    /// Remove all listed packages with one package-manager call.
    ///
    /// Returns true when the package manager reported success.
    pub fn erase_packages(&self, packages: &[String], report: &mut CleanupReport) -> bool {
        let packages: Vec<String> = packages
            .iter()
            .filter(|p| !p.is_empty())
            .filter(|p| {
                let protected = PACKAGES_BLACK_LIST.contains(&p.as_str());
                if protected {
                    tracing::warn!("Not removing protected package: {}", p);
                }
                !protected
            })
            .cloned()
            .collect();
        if packages.is_empty() {
            return false;
        }
        let target = packages.join(" ");
        tracing::debug!("Erasing packages: {}", target);

        let Some(command) = self.os_family.package_erase_command(&packages) else {
            tracing::warn!(
                "Unsupported OS type '{}', cannot remove package.",
                self.os_family
            );
            return false;
        };

        tracing::debug!("Executing: {}", command);
        match self.runner.run(&command) {
            Ok(out) if out.success() => {
                tracing::info!("Erased packages successfully.\n{}", out.stdout);
                report.record(Section::Packages, target, RemovalResult::Success);
                true
            }
            Ok(out) => {
                tracing::warn!("Erasing packages failed: {}", out.stderr.trim());
                report.record(
                    Section::Packages,
                    target,
                    RemovalResult::failure(out.stderr.trim().to_string()),
                );
                false
            }
            Err(e) => {
                tracing::warn!("Erasing packages failed: {}", e);
                report.record(Section::Packages, target, RemovalResult::failure(e.to_string()));
                false
            }
        }
    }

    /// Delete the stack-select marker if present
    pub fn remove_select_marker(&self, report: &mut CleanupReport) {
        let marker = &self.layout.select_marker;
        if marker.is_file() {
            remover::erase_files(std::slice::from_ref(marker), Section::Packages, report);
        }
    }

    /// Delete each account with its home directory, then the shared group
    pub fn delete_users(&self, users: &[String], report: &mut CleanupReport) {
        for user in users.iter().filter(|u| !u.is_empty()) {
            let command = CommandSpec::new("userdel", ["-rf", user.as_str()]);
            let result = match self.runner.run(&command) {
                Ok(out) if out.success() => {
                    tracing::info!("Successfully deleted user: {}", user);
                    RemovalResult::Success
                }
                Ok(out) => {
                    tracing::warn!("Cannot delete user : {}, {}", user, out.stderr.trim());
                    RemovalResult::failure(out.stderr.trim().to_string())
                }
                Err(e) => {
                    tracing::warn!("Cannot delete user : {}, {}", user, e);
                    RemovalResult::failure(e.to_string())
                }
            };
            report.record(Section::Users, user.clone(), result);
        }
        self.delete_group(report);
    }

    pub fn delete_group(&self, report: &mut CleanupReport) {
        let command = CommandSpec::new("groupdel", [HADOOP_GROUP]);
        let result = match self.runner.run(&command) {
            Ok(out) if out.success() => {
                tracing::info!("Successfully deleted group: {}", HADOOP_GROUP);
                RemovalResult::Success
            }
            Ok(out) => {
                tracing::warn!("Cannot delete group : {}, {}", HADOOP_GROUP, out.stderr.trim());
                RemovalResult::failure(out.stderr.trim().to_string())
            }
            Err(e) => {
                tracing::warn!("Cannot delete group : {}, {}", HADOOP_GROUP, e);
                RemovalResult::failure(e.to_string())
            }
        };
        report.record(Section::Users, format!("group:{}", HADOOP_GROUP), result);
    }

    /// Directories directly under the scan roots whose name carries a known prefix
    pub fn find_additional_dirs(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for root in &self.layout.additional_dir_roots {
            found.extend(
                WalkDir::new(root)
                    .min_depth(1)
                    .max_depth(1)
                    .follow_links(false)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_dir())
                    .filter(|e| {
                        let name = e.file_name().to_string_lossy();
                        self.layout
                            .additional_dir_prefixes
                            .iter()
                            .any(|p| !p.is_empty() && name.contains(p.as_str()))
                    })
                    .map(|e| e.into_path()),
            );
        }
        found.sort();
        found
    }

    /// Repo directory for this OS family, if it has one we understand
    pub fn repo_dir(&self) -> Option<&Path> {
        match self.os_family {
            OsFamily::Redhat => Some(&self.layout.rhel_repo_dir),
            OsFamily::Suse => Some(&self.layout.suse_repo_dir),
            _ => None,
        }
    }

    pub fn find_repo_files(&self, repo_names: &[String]) -> Vec<PathBuf> {
        match self.repo_dir() {
            Some(dir) => repos::find_repo_files(repo_names, dir),
            None => {
                tracing::warn!("Unsupported OS type, cannot get repository location.");
                Vec::new()
            }
        }
    }
}
