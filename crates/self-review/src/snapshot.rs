//! Snapshot persistence
//!
//! The fetch command writes a timestamped JSON snapshot of the raw fetch
//! output; the analyze command reads the newest one back. Files are
//! write-once with a fresh name per run, so concurrent runs can only race
//! on which timestamp wins, never corrupt each other.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use review_analysis::{Confidence, DateRange, DateSource};
use review_sources::WorkItem;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_PREFIX: &str = "recent-work-";
pub const SNAPSHOT_SUFFIX: &str = ".json";
pub const TIMESTAMP_FORMAT: &str = "%y%m%d-%H%M%S";

/// Snapshot metadata: how and when the data was fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub generated_at: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub date_source: DateSource,
    pub date_confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_explanation: Option<String>,
    pub total_items: usize,
}

/// Persisted raw fetch output, consumed by the analyze stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub code_change_items: Vec<WorkItem>,
    pub ticket_items: Vec<WorkItem>,
}

impl Snapshot {
    pub fn new(
        range: &DateRange,
        code_change_items: Vec<WorkItem>,
        ticket_items: Vec<WorkItem>,
        generated_at: DateTime<Local>,
    ) -> Self {
        let total_items = code_change_items.len() + ticket_items.len();
        Self {
            metadata: SnapshotMetadata {
                generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                start_date: range.start_date,
                end_date: range.end_date,
                date_source: range.source,
                date_confidence: range.confidence,
                date_explanation: range.explanation.clone(),
                total_items,
            },
            code_change_items,
            ticket_items,
        }
    }

    /// Combined item list in analysis order: code changes first, then
    /// tickets, each in fetch order. Cluster item numbers index into this.
    pub fn combined_items(&self) -> Vec<WorkItem> {
        self.code_change_items
            .iter()
            .chain(self.ticket_items.iter())
            .cloned()
            .collect()
    }

    /// Write to `dir` under a timestamped, never-reused filename
    pub fn write_timestamped(&self, dir: &Path, now: DateTime<Local>) -> Result<PathBuf> {
        let filename = format!(
            "{SNAPSHOT_PREFIX}{}{SNAPSHOT_SUFFIX}",
            now.format(TIMESTAMP_FORMAT)
        );
        let path = dir.join(filename);
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write snapshot file: {}", path.display()))?;
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))
    }
}

/// Newest snapshot in `dir`: the lexicographically last matching filename
/// (the timestamp format makes that the most recent).
pub fn latest_snapshot(dir: &Path) -> Result<Option<PathBuf>> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| {
                    name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(SNAPSHOT_SUFFIX)
                })
        })
        .map(|entry| entry.path())
        .collect();

    candidates.sort();
    Ok(candidates.pop())
}
