use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::command::CommandSpec;

pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Distribution family; decides which package manager and repo layout apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Redhat,
    Suse,
    #[serde(alias = "ubuntu")]
    Debian,
    Other(String),
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Redhat => write!(f, "redhat"),
            OsFamily::Suse => write!(f, "suse"),
            OsFamily::Debian => write!(f, "debian"),
            OsFamily::Other(id) => write!(f, "{}", id),
        }
    }
}

impl OsFamily {
    /// Map a single os-release identifier to a family
    fn from_id(id: &str) -> Option<Self> {
        match id {
            "rhel" | "centos" | "fedora" | "rocky" | "almalinux" | "ol" | "amzn" => {
                Some(OsFamily::Redhat)
            }
            "suse" | "sles" | "sled" | "opensuse" | "opensuse-leap" | "opensuse-tumbleweed" => {
                Some(OsFamily::Suse)
            }
            "debian" | "ubuntu" => Some(OsFamily::Debian),
            _ => None,
        }
    }

    /// Classify `/etc/os-release` content using `ID` first, then `ID_LIKE`
    pub fn from_os_release(content: &str) -> Self {
        let mut id = String::new();
        let mut id_like = String::new();

        for line in content.lines() {
            let line = line.trim();
            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"').trim_matches('\'').to_lowercase();
                match key.trim() {
                    "ID" => id = value,
                    "ID_LIKE" => id_like = value,
                    _ => {}
                }
            }
        }

        let known = std::iter::once(id.as_str())
            .chain(id_like.split_whitespace())
            .find_map(Self::from_id);

        known.unwrap_or_else(|| {
            if id.is_empty() {
                OsFamily::Other("unknown".to_string())
            } else {
                OsFamily::Other(id)
            }
        })
    }

    /// Detect the local family, reading the given os-release file
    pub fn detect(os_release: &Path) -> Self {
        match std::fs::read_to_string(os_release) {
            Ok(content) => Self::from_os_release(&content),
            Err(e) => {
                tracing::warn!(
                    "Cannot read {}: {}, OS family unknown",
                    os_release.display(),
                    e
                );
                OsFamily::Other("unknown".to_string())
            }
        }
    }

    /// Package removal command for the given packages, None if unsupported
    pub fn package_erase_command(&self, packages: &[String]) -> Option<CommandSpec> {
        let (program, flags): (&str, &[&str]) = match self {
            OsFamily::Redhat => ("yum", &["erase", "-y"]),
            OsFamily::Suse => ("zypper", &["-n", "-q", "remove"]),
            OsFamily::Debian => ("/usr/bin/apt-get", &["-y", "-q", "remove"]),
            OsFamily::Other(_) => return None,
        };
        let args = flags
            .iter()
            .map(|s| s.to_string())
            .chain(packages.iter().cloned());
        Some(CommandSpec::new(program, args))
    }

    /// Binary managing the alternatives registry on this family
    pub fn alternatives_binary(&self) -> &'static str {
        match self {
            OsFamily::Debian => "update-alternatives",
            _ => "alternatives",
        }
    }
}
