use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::system::os_family::OsFamily;

/// Default location of the agent configuration read by host cleanup
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ambari-agent/conf/host-cleanup.toml";

pub const HOST_CHECK_FILE_NAME: &str = "hostcheck.result";
pub const HOST_CHECK_CUSTOM_ACTIONS_FILE: &str = "hostcheck_custom_actions.result";
pub const OUTPUT_FILE_NAME: &str = "hostcleanup.result";
pub const SELECT_MARKER_FILE_NAME: &str = "hdp-select-set-all.performed";

/// Agent settings that host cleanup depends on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent data directory holding the host check results
    #[serde(default = "default_prefix")]
    pub prefix: PathBuf,

    /// Agent cache directory cleared after the manifest-driven cleanup
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Force an OS family instead of reading /etc/os-release
    #[serde(default)]
    pub os_family: Option<OsFamily>,

    /// Binary prefixed to every OS command (e.g. a sudo wrapper)
    #[serde(default)]
    pub sudo_binary: Option<String>,

    /// Host paths scanned and modified during cleanup
    #[serde(default)]
    pub layout: HostLayout,
}

/// Fixed host locations the cleanup steps look at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostLayout {
    /// Folders swept for entries owned by removed users
    #[serde(default = "default_owned_file_folders")]
    pub owned_file_folders: Vec<PathBuf>,

    /// Parents scanned for leftover per-run directories
    #[serde(default = "default_additional_dir_roots")]
    pub additional_dir_roots: Vec<PathBuf>,

    /// Name fragments identifying leftover per-run directories
    #[serde(default = "default_additional_dir_prefixes")]
    pub additional_dir_prefixes: Vec<String>,

    /// Marker telling the agent to re-run stack version selection.
    /// Left empty, it resolves to `<prefix>/hdp-select-set-all.performed`.
    #[serde(default)]
    pub select_marker: PathBuf,

    #[serde(default = "default_rhel_repo_dir")]
    pub rhel_repo_dir: PathBuf,

    #[serde(default = "default_suse_repo_dir")]
    pub suse_repo_dir: PathBuf,
}

fn default_prefix() -> PathBuf {
    PathBuf::from("/var/lib/ambari-agent/data")
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from("/var/lib/ambari-agent/cache")
}
fn default_owned_file_folders() -> Vec<PathBuf> {
    vec![PathBuf::from("/tmp")]
}
fn default_additional_dir_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("/tmp")]
}
fn default_additional_dir_prefixes() -> Vec<String> {
    vec!["hadoop-".to_string(), "hsperfdata_".to_string()]
}
fn default_rhel_repo_dir() -> PathBuf {
    PathBuf::from("/etc/yum.repos.d")
}
fn default_suse_repo_dir() -> PathBuf {
    PathBuf::from("/etc/zypp/repos.d")
}

impl Default for HostLayout {
    fn default() -> Self {
        Self {
            owned_file_folders: default_owned_file_folders(),
            additional_dir_roots: default_additional_dir_roots(),
            additional_dir_prefixes: default_additional_dir_prefixes(),
            select_marker: PathBuf::new(),
            rhel_repo_dir: default_rhel_repo_dir(),
            suse_repo_dir: default_suse_repo_dir(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            cache_dir: default_cache_dir(),
            os_family: None,
            sudo_binary: None,
            layout: HostLayout::default(),
        }
        .with_prefix_paths()
    }
}

impl AgentConfig {
    /// Load config from file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                "No config found at {}, using defaults",
                path.display()
            );
            return Ok(AgentConfig::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: AgentConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config.with_prefix_paths())
    }

    /// Fill layout paths that default to locations under `prefix`
    fn with_prefix_paths(mut self) -> Self {
        if self.layout.select_marker.as_os_str().is_empty() {
            self.layout.select_marker = self.prefix.join(SELECT_MARKER_FILE_NAME);
        }
        self
    }

    /// Default pair of host check result files
    pub fn host_check_files(&self) -> Vec<PathBuf> {
        vec![
            self.prefix.join(HOST_CHECK_FILE_NAME),
            self.prefix.join(HOST_CHECK_CUSTOM_ACTIONS_FILE),
        ]
    }

    /// Default output log file
    pub fn output_file(&self) -> PathBuf {
        self.prefix.join(OUTPUT_FILE_NAME)
    }
}
