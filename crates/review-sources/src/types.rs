//! Work item data transfer objects
//!
//! These types represent normalized units of completed work. They are
//! intentionally flat so they can be persisted in a snapshot file and
//! consumed by the analysis stages without source-specific knowledge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What kind of work an item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemKind {
    /// A merged code change (GitHub pull request)
    CodeChange,
    /// A completed ticket (Jira issue in a done status)
    Ticket,
}

/// A normalized unit of completed work
///
/// Source-specific fields (`repository`, `key`, `priority`, `issue_type`)
/// are preserved for the report but not required by the analysis stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub kind: WorkItemKind,

    /// Item title; ticket items use the "KEY: summary" convention
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Canonical link to the item
    pub url: String,

    /// Merge date or last status-change date; None when the source did
    /// not report one
    pub completed_on: Option<NaiveDate>,

    /// Repository slug ("owner/name") for code changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Ticket key (e.g. "PROJ-123")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
}

/// Sort items most recent first; items without a completion date sort last
pub fn sort_most_recent_first(items: &mut [WorkItem]) {
    items.sort_by(|a, b| b.completed_on.cmp(&a.completed_on));
}
