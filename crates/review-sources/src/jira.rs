//! Jira done-ticket fetcher
//!
//! One JQL search per fetch: tickets assigned to the authenticated user,
//! in a done status, with their last update inside the date interval. The
//! page size of 100 covers the result sets this tool deals with, so no
//! pagination loop is needed here.

use crate::types::{sort_most_recent_first, WorkItem, WorkItemKind};
use anyhow::Context;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;

const MAX_RESULTS: usize = 100;
const SEARCH_FIELDS: &str = "key,summary,status,updated,description,assignee,priority,issuetype";

/// Fetches completed tickets via the Jira REST API with basic auth
pub struct JiraFetcher {
    base_url: String,
    username: String,
    token: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Debug, Deserialize)]
struct JiraIssue {
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: String,
    updated: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<NamedField>,
    #[serde(default)]
    priority: Option<NamedField>,
    #[serde(default)]
    issuetype: Option<NamedField>,
}

#[derive(Debug, Deserialize)]
struct NamedField {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Myself {
    #[serde(rename = "displayName")]
    display_name: String,
}

impl JiraFetcher {
    pub fn new(base_url: &str, username: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            token: token.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Display name of the authenticated user
    pub async fn authenticated_user(&self) -> anyhow::Result<String> {
        let url = format!("{}/rest/api/2/myself", self.base_url);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.token))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .context("Jira request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Jira API returned HTTP {}", response.status());
        }

        let myself: Myself = response
            .json()
            .await
            .context("Invalid JSON in Jira response")?;
        Ok(myself.display_name)
    }

    /// Fetch done tickets assigned to the authenticated user, updated
    /// within `[start, end]`, most recent first.
    ///
    /// Degrades to an empty list on any upstream failure; zero items may
    /// therefore mean "Jira unreachable" rather than "no work done".
    pub async fn fetch_done_tickets(&self, start: NaiveDate, end: NaiveDate) -> Vec<WorkItem> {
        match self.try_fetch_done_tickets(start, end).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Jira fetch failed, continuing with no tickets: {e:#}");
                Vec::new()
            }
        }
    }

    async fn try_fetch_done_tickets(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<WorkItem>> {
        let jql = format!(
            "assignee = currentUser() AND status = Done \
             AND updated >= '{start}' AND updated <= '{end}'"
        );
        debug!("Jira JQL query: {jql}");

        let url = format!("{}/rest/api/2/search", self.base_url);
        let max_results = MAX_RESULTS.to_string();
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.token))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("jql", jql.as_str()),
                ("fields", SEARCH_FIELDS),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await
            .context("Jira search request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Jira API returned HTTP {}", response.status());
        }

        let results: SearchResults = response
            .json()
            .await
            .context("Invalid JSON in Jira search response")?;

        let mut items: Vec<WorkItem> = results
            .issues
            .into_iter()
            .map(|issue| self.convert_issue(issue))
            .collect();
        sort_most_recent_first(&mut items);
        debug!("Fetched {} done tickets", items.len());
        Ok(items)
    }

    fn convert_issue(&self, issue: JiraIssue) -> WorkItem {
        let fields = issue.fields;
        WorkItem {
            kind: WorkItemKind::Ticket,
            title: format!("{}: {}", issue.key, fields.summary),
            description: fields.description.unwrap_or_default(),
            url: format!("{}/browse/{}", self.base_url, issue.key),
            completed_on: parse_updated_date(&fields.updated),
            repository: None,
            key: Some(issue.key),
            status: fields.status.map(|s| s.name),
            priority: Some(
                fields
                    .priority
                    .map(|p| p.name)
                    .unwrap_or_else(|| "None".to_string()),
            ),
            issue_type: fields.issuetype.map(|t| t.name),
        }
    }
}

/// Date part of a Jira timestamp ("2024-05-01T12:34:56.000+0000")
fn parse_updated_date(updated: &str) -> Option<NaiveDate> {
    updated.get(..10).and_then(|date| date.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> JiraFetcher {
        JiraFetcher::new("https://example.atlassian.net/", "user@example.com", "token")
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        assert_eq!(fetcher().base_url, "https://example.atlassian.net");
    }

    #[test]
    fn test_parse_updated_date() {
        assert_eq!(
            parse_updated_date("2024-05-01T12:34:56.000+0000"),
            Some("2024-05-01".parse().unwrap())
        );
        assert_eq!(parse_updated_date("not a date"), None);
        assert_eq!(parse_updated_date(""), None);
    }

    #[test]
    fn test_convert_issue() {
        let issue: JiraIssue = serde_json::from_value(serde_json::json!({
            "key": "PROJ-123",
            "fields": {
                "summary": "Ship the widget",
                "updated": "2024-05-01T12:34:56.000+0000",
                "description": "Widget shipping work.",
                "status": { "name": "Done" },
                "priority": { "name": "High" },
                "issuetype": { "name": "Story" }
            }
        }))
        .unwrap();

        let item = fetcher().convert_issue(issue);
        assert_eq!(item.kind, WorkItemKind::Ticket);
        assert_eq!(item.title, "PROJ-123: Ship the widget");
        assert_eq!(item.url, "https://example.atlassian.net/browse/PROJ-123");
        assert_eq!(item.completed_on, Some("2024-05-01".parse().unwrap()));
        assert_eq!(item.priority.as_deref(), Some("High"));
        assert_eq!(item.issue_type.as_deref(), Some("Story"));
    }

    #[test]
    fn test_convert_issue_defaults() {
        let issue: JiraIssue = serde_json::from_value(serde_json::json!({
            "key": "PROJ-7",
            "fields": {
                "summary": "Untriaged task",
                "updated": "2024-04-02T08:00:00.000+0000"
            }
        }))
        .unwrap();

        let item = fetcher().convert_issue(issue);
        assert_eq!(item.description, "");
        assert_eq!(item.priority.as_deref(), Some("None"));
        assert!(item.status.is_none());
    }
}
