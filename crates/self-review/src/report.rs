//! Markdown report rendering

use crate::snapshot::SnapshotMetadata;
use chrono::{DateTime, Local};
use review_analysis::WorkCluster;
use review_sources::{WorkItem, WorkItemKind};

pub const REPORT_PREFIX: &str = "analysis-";

/// Render the analysis report as markdown
pub fn render(
    metadata: &SnapshotMetadata,
    clusters: &[WorkCluster],
    accomplishments: &[String],
    generated_at: DateTime<Local>,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Work Analysis".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!(
        "Data period: {} to {}",
        metadata.start_date, metadata.end_date
    ));
    lines.push(format!("Total items analyzed: {}", metadata.total_items));
    lines.push(String::new());

    lines.push("## Key Accomplishments".to_string());
    lines.push(String::new());
    for accomplishment in accomplishments {
        lines.push(format!("- {accomplishment}"));
    }
    lines.push(String::new());

    lines.push("## Work Clusters".to_string());
    lines.push(String::new());
    for (index, cluster) in clusters.iter().enumerate() {
        lines.push(format!("### {}. {}", index + 1, cluster.name));
        lines.push(String::new());
        lines.push(cluster.description.clone());
        lines.push(String::new());
        lines.push(format!("**Items ({}):**", cluster.items.len()));
        for item in &cluster.items {
            lines.push(render_item(item));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn render_item(item: &WorkItem) -> String {
    match item.kind {
        WorkItemKind::CodeChange => {
            let repo = item
                .repository
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            format!("- {}{} ({})", item.title, repo, item.url)
        }
        // Ticket titles already carry the "KEY: summary" convention
        WorkItemKind::Ticket => format!("- {} ({})", item.title, item.url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_analysis::{Confidence, DateSource};

    fn metadata() -> SnapshotMetadata {
        SnapshotMetadata {
            generated_at: "2024-06-15 12:00:00".to_string(),
            start_date: "2024-05-16".parse().unwrap(),
            end_date: "2024-06-15".parse().unwrap(),
            date_source: DateSource::Default,
            date_confidence: Confidence::High,
            date_explanation: None,
            total_items: 2,
        }
    }

    fn item(kind: WorkItemKind, title: &str, repository: Option<&str>) -> WorkItem {
        WorkItem {
            kind,
            title: title.to_string(),
            description: String::new(),
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            completed_on: None,
            repository: repository.map(str::to_string),
            key: None,
            status: None,
            priority: None,
            issue_type: None,
        }
    }

    #[test]
    fn test_render_full_report() {
        let clusters = vec![WorkCluster {
            name: "API Work".to_string(),
            description: "Endpoint changes".to_string(),
            item_numbers: vec![1, 2],
            items: vec![
                item(WorkItemKind::CodeChange, "Add retries", Some("acme/widgets")),
                item(WorkItemKind::Ticket, "PROJ-1: Ship it", None),
            ],
        }];
        let accomplishments = vec!["Shipped the API".to_string()];

        let report = render(&metadata(), &clusters, &accomplishments, Local::now());

        assert!(report.starts_with("# Work Analysis"));
        assert!(report.contains("Data period: 2024-05-16 to 2024-06-15"));
        assert!(report.contains("Total items analyzed: 2"));
        assert!(report.contains("## Key Accomplishments"));
        assert!(report.contains("- Shipped the API"));
        assert!(report.contains("### 1. API Work"));
        assert!(report.contains("**Items (2):**"));
        assert!(report.contains("- Add retries (acme/widgets) (https://example.com/Add-retries)"));
        assert!(report.contains("- PROJ-1: Ship it (https://example.com/PROJ-1:-Ship-it)"));
    }

    #[test]
    fn test_render_with_no_clusters() {
        let report = render(&metadata(), &[], &["Did things".to_string()], Local::now());
        assert!(report.contains("## Work Clusters"));
        assert!(!report.contains("### 1."));
    }
}
