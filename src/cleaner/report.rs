use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::manifest::Section;

/// Outcome of one attempted removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemovalResult {
    Success,
    Failure { reason: String },
}

impl RemovalResult {
    pub fn failure(reason: impl Into<String>) -> Self {
        RemovalResult::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RemovalResult::Success)
    }
}

/// A single action taken during the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub section: Section,
    pub target: String,
    pub result: RemovalResult,
}

/// Everything a cleanup run attempted, in execution order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub records: Vec<ActionRecord>,

    #[serde(skip, default = "Instant::now")]
    started: Instant,
}

impl Default for CleanupReport {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanupReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration_secs: 0.0,
            records: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn record(&mut self, section: Section, target: impl Into<String>, result: RemovalResult) {
        self.records.push(ActionRecord {
            section,
            target: target.into(),
            result,
        });
    }

    /// Stamp the elapsed time since the report was created
    pub fn finish(&mut self) {
        self.duration_secs = self.started.elapsed().as_secs_f64();
    }

    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.result.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionRecord> {
        self.records.iter().filter(|r| !r.result.is_success())
    }

    pub fn for_section(&self, section: Section) -> impl Iterator<Item = &ActionRecord> {
        self.records.iter().filter(move |r| r.section == section)
    }
}
