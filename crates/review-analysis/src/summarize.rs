//! Accomplishment summarization
//!
//! Condenses resolved clusters into a short bullet list. The oracle's
//! answer is free text; only lines that look like list entries survive
//! parsing, everything else is discarded without complaint.

use crate::cluster::WorkCluster;
use log::warn;
use regex::Regex;
use review_oracle::Oracle;
use std::sync::LazyLock;

static NUMERIC_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

const BULLET_MARKERS: [&str; 3] = ["- ", "* ", "\u{2022} "];

/// Summarize clusters into accomplishment bullets.
///
/// Always returns a non-empty list: an oracle failure yields three
/// generated fallback sentences instead.
pub async fn summarize_accomplishments(
    clusters: &[WorkCluster],
    oracle: &dyn Oracle,
) -> Vec<String> {
    let prompt = build_summary_prompt(clusters);
    match oracle.ask(&prompt).await {
        Ok(answer) => parse_bullets(&answer.content),
        Err(e) => {
            warn!("Summary request failed, using generated summary: {e}");
            fallback_summary(clusters)
        }
    }
}

fn build_summary_prompt(clusters: &[WorkCluster]) -> String {
    let clusters_text = clusters
        .iter()
        .map(|cluster| {
            format!(
                "- {}: {} ({} items)",
                cluster.name,
                cluster.description,
                cluster.items.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful assistant that summarizes technical accomplishments concisely.\n\
         \n\
         Based on these work clusters, create a concise bullet-point summary of \
         accomplishments:\n\
         \n\
         {clusters_text}\n\
         \n\
         Create 3-7 bullet points that highlight key accomplishments and impact. Focus on:\n\
         - What was built or improved\n\
         - Problems solved\n\
         - Value delivered\n\
         \n\
         Format as a simple markdown list with bullet points."
    )
}

/// Keep only lines that start with a bullet or numeric list marker,
/// stripped of the marker.
fn parse_bullets(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| strip_marker(line.trim()))
        .collect()
}

fn strip_marker(line: &str) -> Option<String> {
    for marker in BULLET_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim_start().to_string());
        }
    }
    if NUMERIC_MARKER.is_match(line) {
        return Some(NUMERIC_MARKER.replace(line, "").to_string());
    }
    None
}

/// Three generated sentences so the analyze stage always ends with
/// non-empty output. Uses resolved cluster items for the count.
fn fallback_summary(clusters: &[WorkCluster]) -> Vec<String> {
    let total: usize = clusters.iter().map(|cluster| cluster.items.len()).sum();
    vec![
        format!("Completed {total} work items across multiple areas"),
        "Made progress on software development and task completion".to_string(),
        "Delivered features and fixes to improve system functionality".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockOracle;

    fn cluster(name: &str, item_count: usize) -> WorkCluster {
        WorkCluster {
            name: name.to_string(),
            description: format!("{name} work"),
            item_numbers: (1..=item_count).collect(),
            items: (0..item_count)
                .map(|i| review_sources::WorkItem {
                    kind: review_sources::WorkItemKind::CodeChange,
                    title: format!("item {i}"),
                    description: String::new(),
                    url: String::new(),
                    completed_on: None,
                    repository: None,
                    key: None,
                    status: None,
                    priority: None,
                    issue_type: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_bullet_lines_are_extracted_in_order() {
        let oracle = MockOracle::answering(
            "Here is your summary:\n\
             - Shipped the new API\n\
             * Fixed the flaky deploy\n\
             \u{2022} Improved onboarding docs\n\
             1. Reduced build times\n\
             That covers everything.",
        );
        let bullets = summarize_accomplishments(&[cluster("API", 2)], &oracle).await;

        assert_eq!(
            bullets,
            vec![
                "Shipped the new API",
                "Fixed the flaky deploy",
                "Improved onboarding docs",
                "Reduced build times",
            ]
        );
    }

    #[tokio::test]
    async fn test_parsing_is_idempotent_on_clean_lists() {
        let oracle = MockOracle::answering("- A\n- B");
        let bullets = summarize_accomplishments(&[], &oracle).await;
        assert_eq!(bullets, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_oracle_failure_yields_three_sentences() {
        let oracle = MockOracle::failing();
        let clusters = vec![cluster("API", 2), cluster("Infra", 3)];
        let bullets = summarize_accomplishments(&clusters, &oracle).await;

        assert_eq!(bullets.len(), 3);
        assert_eq!(bullets[0], "Completed 5 work items across multiple areas");
    }

    #[test]
    fn test_non_bullet_lines_are_discarded_not_errors() {
        assert!(parse_bullets("no list here\njust prose").is_empty());
    }

    #[test]
    fn test_prompt_lists_cluster_names_and_counts() {
        let prompt = build_summary_prompt(&[cluster("API", 2)]);
        assert!(prompt.contains("- API: API work (2 items)"));
    }

    #[test]
    fn test_strip_marker_variants() {
        assert_eq!(strip_marker("- one").as_deref(), Some("one"));
        assert_eq!(strip_marker("12. twelve").as_deref(), Some("twelve"));
        assert_eq!(strip_marker("-no space"), None);
        assert_eq!(strip_marker("plain text"), None);
    }
}
