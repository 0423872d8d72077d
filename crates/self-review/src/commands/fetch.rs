//! Fetch command: collect recent work and persist a snapshot
//!
//! Pipeline: config gate, date-range resolution, both source fetches in
//! sequence, snapshot write. Each source fetch degrades to an empty list
//! on failure; only a complete lack of credentials aborts the run.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::warn;
use review_analysis::{resolve_date_range, Confidence, DateParseError, DateRange, DateSource};
use review_config::Config;
use review_oracle::select_provider;
use review_sources::{GithubFetcher, JiraFetcher};
use std::path::Path;

use crate::snapshot::Snapshot;

pub async fn run(config: &Config, date_input: Option<&str>) -> Result<()> {
    println!("Fetching recent work...");
    println!();

    if !config.has_any_source() {
        anyhow::bail!(
            "No credentials configured. Add a GitHub token or Jira credentials \
             to ~/.config/self-review/config.toml first."
        );
    }

    let today = Local::now().date_naive();
    let range = resolve_range(config, date_input, today).await;

    if date_input.is_some() {
        println!("Date range: {} to {}", range.start_date, range.end_date);
        if let Some(explanation) = &range.explanation {
            println!("Interpreted as: {explanation}");
        }
        println!();
    }

    let mut code_changes = Vec::new();
    if let Some(token) = config.github_token() {
        println!("Fetching from GitHub...");
        match GithubFetcher::new(token) {
            Ok(fetcher) => {
                code_changes = fetcher
                    .fetch_merged_prs(range.start_date, range.end_date)
                    .await;
            }
            Err(e) => warn!("Could not create GitHub client: {e:#}"),
        }
        println!("Found {} merged PRs", code_changes.len());
    }

    let mut tickets = Vec::new();
    if let Some(url) = config.jira_url() {
        match (config.jira_username(), config.jira_token()) {
            (Some(username), Some(token)) => {
                println!("Fetching from Jira...");
                let fetcher = JiraFetcher::new(url, username, token);
                tickets = fetcher
                    .fetch_done_tickets(range.start_date, range.end_date)
                    .await;
                println!("Found {} completed tickets", tickets.len());
            }
            _ => warn!("Jira URL configured but username/token missing, skipping Jira"),
        }
    }

    let snapshot = Snapshot::new(&range, code_changes, tickets, Local::now());
    let path = snapshot.write_timestamped(Path::new("."), Local::now())?;

    println!();
    println!("Work data saved to {}", path.display());
    println!("Total items: {}", snapshot.metadata.total_items);
    Ok(())
}

/// Resolve the date range, degrading a malformed explicit date to the
/// default window instead of aborting the fetch.
async fn resolve_range(config: &Config, input: Option<&str>, today: NaiveDate) -> DateRange {
    let oracle = select_provider(config.anthropic_api_key(), config.openai_api_key()).ok();

    match resolve_date_range(input, today, oracle.as_deref()).await {
        Ok(range) => range,
        Err(DateParseError::InvalidFormat(value)) => {
            println!("Invalid date format: {value}. Using default range (last 30 days).");
            DateRange::default_window(today, DateSource::FallbackDefault, Confidence::Low)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_sources_configured_halts_before_fetching() {
        let result = run(&Config::default(), None).await;
        let message = result.unwrap_err().to_string();
        assert!(message.contains("No credentials configured"));
    }

    #[tokio::test]
    async fn test_malformed_explicit_date_degrades_to_default_window() {
        let today: NaiveDate = "2024-06-15".parse().unwrap();
        let range = resolve_range(&Config::default(), Some("2024-99-99"), today).await;

        assert_eq!(range.start_date, "2024-05-16".parse().unwrap());
        assert_eq!(range.end_date, today);
        assert_eq!(range.source, DateSource::FallbackDefault);
        assert_eq!(range.confidence, Confidence::Low);
    }
}
