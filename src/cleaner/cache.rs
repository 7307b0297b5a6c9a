use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::remover;
use super::report::CleanupReport;
use crate::manifest::Section;

/// What to clear inside one cache sub-folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CachePattern {
    /// File name globs matched directly inside the folder
    Masks(Vec<String>),
    /// Further sub-folders, each with its own pattern
    Nested(BTreeMap<String, CachePattern>),
}

/// Transient cache files the agent leaves behind
pub fn default_patterns() -> BTreeMap<String, CachePattern> {
    let mut patterns = BTreeMap::new();
    patterns.insert(
        "alerts".to_string(),
        CachePattern::Masks(vec!["*.json".to_string()]),
    );
    patterns
}

/// Resolve every file under `cache_root` matched by `patterns`
pub fn resolve(cache_root: &Path, patterns: &BTreeMap<String, CachePattern>) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for (folder, pattern) in patterns {
        let dir = cache_root.join(folder);
        match pattern {
            CachePattern::Masks(masks) => {
                for mask in masks {
                    match glob::Pattern::new(mask) {
                        Ok(glob) => found.extend(remover::list_files(&dir, Some(&glob))),
                        Err(e) => tracing::warn!("Invalid cache mask '{}': {}", mask, e),
                    }
                }
            }
            CachePattern::Nested(children) => found.extend(resolve(&dir, children)),
        }
    }
    found.sort();
    found.dedup();
    found
}

/// Delete the cache files matched by `patterns`
pub fn clear_cache(
    cache_root: &Path,
    patterns: &BTreeMap<String, CachePattern>,
    report: &mut CleanupReport,
) {
    let files = resolve(cache_root, patterns);
    tracing::info!(
        "Clearing {} cache file(s) under {}",
        files.len(),
        cache_root.display()
    );
    remover::erase_files(&files, Section::Cache, report);
}
