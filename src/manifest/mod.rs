pub mod ini;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::common::errors::CleanupError;
use ini::IniDocument;

pub const PACKAGE_KEY: &str = "pkg_list";
pub const PROCESS_KEY: &str = "proc_list";
pub const USER_KEY: &str = "usr_list";
pub const USER_HOMEDIR_KEY: &str = "usr_homedir_list";
pub const REPOS_KEY: &str = "repo_list";
pub const DIR_KEY: &str = "dir_list";
pub const ALT_SYMLINK_KEY: &str = "symlink_list";
pub const ALT_TARGET_KEY: &str = "target_list";

/// Manifest sections and the cleanup steps that can be skipped by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Packages,
    Users,
    UsrHomedir,
    Repositories,
    Directories,
    AdditionalDirectories,
    Processes,
    Alternatives,
    Cache,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Packages,
        Section::Users,
        Section::UsrHomedir,
        Section::Repositories,
        Section::Directories,
        Section::AdditionalDirectories,
        Section::Processes,
        Section::Alternatives,
        Section::Cache,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Packages => "packages",
            Section::Users => "users",
            Section::UsrHomedir => "usr_homedir",
            Section::Repositories => "repositories",
            Section::Directories => "directories",
            Section::AdditionalDirectories => "additional_directories",
            Section::Processes => "processes",
            Section::Alternatives => "alternatives",
            Section::Cache => "cache",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Section::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown section '{}', expected one of: {}", wanted, names.join(", "))
            })
    }
}

/// Sections the operator asked to leave untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet(BTreeSet<Section>);

impl SkipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, section: Section) -> bool {
        self.0.contains(&section)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Section> for SkipSet {
    fn from_iter<T: IntoIterator<Item = Section>>(iter: T) -> Self {
        SkipSet(iter.into_iter().collect())
    }
}

/// The two parallel lists of the alternatives section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativesSpec {
    /// Alternative names whose registered paths are removed
    pub symlink_list: Option<Vec<String>>,
    /// Configuration directories erased alongside
    pub target_list: Option<Vec<String>>,
}

/// Resources slated for removal, as reported by the host check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupManifest {
    pub packages: Option<Vec<String>>,
    pub processes: Option<Vec<String>>,
    pub users: Option<Vec<String>>,
    pub usr_homedir: Option<Vec<String>>,
    pub repositories: Option<Vec<String>>,
    pub directories: Option<Vec<String>>,
    pub alternatives: Option<AlternativesSpec>,
}

/// Split a comma-separated value, keeping order and blank slots
fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}

impl CleanupManifest {
    /// Build a manifest from INI text; absent keys become absent sections
    pub fn parse(text: &str) -> Result<Self, CleanupError> {
        let doc = IniDocument::parse(text)?;
        Ok(Self::from_document(&doc))
    }

    pub fn from_document(doc: &IniDocument) -> Self {
        for name in doc.sections() {
            if name.parse::<Section>().is_err() {
                tracing::debug!("Ignoring unknown host check section: {}", name);
            }
        }

        let list = |section: Section, key: &str| doc.get(section.as_str(), key).map(split_list);

        let symlink_list = list(Section::Alternatives, ALT_SYMLINK_KEY);
        let target_list = list(Section::Alternatives, ALT_TARGET_KEY);
        let alternatives = if symlink_list.is_some() || target_list.is_some() {
            Some(AlternativesSpec {
                symlink_list,
                target_list,
            })
        } else {
            None
        };

        Self {
            packages: list(Section::Packages, PACKAGE_KEY),
            processes: list(Section::Processes, PROCESS_KEY),
            users: list(Section::Users, USER_KEY),
            // Home directories live under the users section of the file
            usr_homedir: list(Section::Users, USER_HOMEDIR_KEY),
            repositories: list(Section::Repositories, REPOS_KEY),
            directories: list(Section::Directories, DIR_KEY),
            alternatives,
        }
    }

    /// Identifier list for a list-valued section
    pub fn list(&self, section: Section) -> Option<&[String]> {
        let list = match section {
            Section::Packages => &self.packages,
            Section::Processes => &self.processes,
            Section::Users => &self.users,
            Section::UsrHomedir => &self.usr_homedir,
            Section::Repositories => &self.repositories,
            Section::Directories => &self.directories,
            Section::AdditionalDirectories | Section::Alternatives | Section::Cache => {
                return None
            }
        };
        list.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        *self == CleanupManifest::default()
    }
}

/// Read and concatenate the input files
pub fn read_inputs(paths: &[PathBuf]) -> Result<String, CleanupError> {
    let mut combined = String::new();
    for path in paths {
        let content =
            std::fs::read_to_string(path).map_err(|e| CleanupError::io(path.as_path(), e))?;
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&content);
    }
    Ok(combined)
}

/// Load the manifest from the host check files.
///
/// Returns None when any file is missing or the text does not parse; the
/// caller then skips the manifest-driven cleanup.
pub fn load_manifest(paths: &[PathBuf]) -> Option<CleanupManifest> {
    let text = match read_inputs(paths) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Host check result not found: {}", e);
            return None;
        }
    };

    match CleanupManifest::parse(&text) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            tracing::error!("Cannot read host check result: {}", e);
            None
        }
    }
}
