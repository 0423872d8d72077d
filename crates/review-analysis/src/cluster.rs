//! Work clustering
//!
//! Groups a flat list of work items into named thematic clusters via one
//! oracle call. Two fallback tiers keep the result deterministic under
//! failure: a JSON-parse failure collapses everything into a single
//! "General Work" cluster, while an unreachable oracle partitions items
//! by source instead.

use log::warn;
use review_oracle::Oracle;
use review_sources::{WorkItem, WorkItemKind};
use serde::Deserialize;

/// Descriptions are capped in the prompt to bound its size
const MAX_DESCRIPTION_CHARS: usize = 500;

/// A named thematic grouping of work items
///
/// `item_numbers` are 1-based indices into the combined item list (code
/// changes first, then tickets, in fetch order). `items` stays empty
/// until [`resolve_cluster_items`] runs.
#[derive(Debug, Clone)]
pub struct WorkCluster {
    pub name: String,
    pub description: String,
    pub item_numbers: Vec<usize>,
    pub items: Vec<WorkItem>,
}

/// Cluster the combined item list.
///
/// The oracle is asked for 3-7 clusters covering every item; nothing
/// enforces that coverage, and uncovered items are silently dropped when
/// the clusters are resolved.
pub async fn cluster_work(items: &[WorkItem], oracle: &dyn Oracle) -> Vec<WorkCluster> {
    let prompt = build_clustering_prompt(items);
    match oracle.ask(&prompt).await {
        Ok(answer) => parse_clustering_response(&answer.content, items.len()),
        Err(e) => {
            warn!("Clustering request failed, partitioning by source: {e}");
            fallback_partition(items)
        }
    }
}

/// Attach the actual work items to each cluster, silently skipping
/// indices outside the combined list.
pub fn resolve_cluster_items(clusters: &mut [WorkCluster], all_items: &[WorkItem]) {
    for cluster in clusters.iter_mut() {
        cluster.items = cluster
            .item_numbers
            .iter()
            .filter_map(|&number| number.checked_sub(1).and_then(|index| all_items.get(index)))
            .cloned()
            .collect();
    }
}

fn build_clustering_prompt(items: &[WorkItem]) -> String {
    format!(
        "You are a helpful assistant that analyzes software development work and groups \
         it into meaningful clusters.\n\
         \n\
         Please analyze the following work items and group them into 3-7 meaningful \
         clusters based on themes, projects, or types of work:\n\
         \n\
         {listing}\n\
         \n\
         For each cluster, provide:\n\
         1. A descriptive name for the cluster\n\
         2. A brief description of what the cluster represents\n\
         3. The numbers of the work items that belong to this cluster\n\
         \n\
         Every item must be assigned to some cluster; a catch-all \
         \"Miscellaneous\" cluster is fine if needed.\n\
         \n\
         Format your response as JSON with this structure:\n\
         {{\n\
           \"clusters\": [\n\
             {{\n\
               \"name\": \"Cluster Name\",\n\
               \"description\": \"Brief description of the cluster\",\n\
               \"item_numbers\": [1, 3, 5]\n\
             }}\n\
           ]\n\
         }}",
        listing = format_item_listing(items),
    )
}

/// Numbered listing of all items, code changes first, then tickets
fn format_item_listing(items: &[WorkItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let label = match item.kind {
                WorkItemKind::CodeChange => "GitHub PR",
                WorkItemKind::Ticket => "Jira Ticket",
            };
            format!(
                "{number}. {label}: {title}\n   Description: {description}",
                number = index + 1,
                title = item.title,
                description = truncate_description(&item.description),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn truncate_description(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.chars().count() <= MAX_DESCRIPTION_CHARS {
        trimmed.to_string()
    } else {
        let mut truncated: String = trimmed.chars().take(MAX_DESCRIPTION_CHARS).collect();
        truncated.push_str("...");
        truncated
    }
}

#[derive(Debug, Deserialize)]
struct ClusteringResponse {
    clusters: Vec<RawCluster>,
}

#[derive(Debug, Deserialize)]
struct RawCluster {
    name: String,
    description: String,
    #[serde(default)]
    item_numbers: Vec<usize>,
}

/// Map the oracle's JSON onto clusters; a parse failure collapses to a
/// single cluster holding every item.
fn parse_clustering_response(content: &str, total_items: usize) -> Vec<WorkCluster> {
    match serde_json::from_str::<ClusteringResponse>(content) {
        Ok(parsed) => parsed
            .clusters
            .into_iter()
            .map(|cluster| WorkCluster {
                name: cluster.name,
                description: cluster.description,
                item_numbers: cluster.item_numbers,
                items: Vec::new(),
            })
            .collect(),
        Err(e) => {
            warn!("Could not parse clustering response as JSON: {e}");
            vec![WorkCluster {
                name: "General Work".to_string(),
                description: "Mixed development tasks and improvements".to_string(),
                item_numbers: (1..=total_items).collect(),
                items: Vec::new(),
            }]
        }
    }
}

/// Source-based partition used when the oracle is unreachable. Relies on
/// the combined-list ordering invariant: code changes first, then
/// tickets.
fn fallback_partition(items: &[WorkItem]) -> Vec<WorkCluster> {
    let code_changes = items
        .iter()
        .filter(|item| item.kind == WorkItemKind::CodeChange)
        .count();
    let tickets = items.len() - code_changes;

    let mut clusters = Vec::new();
    if code_changes > 0 {
        clusters.push(WorkCluster {
            name: "GitHub Development".to_string(),
            description: "Pull requests and code changes".to_string(),
            item_numbers: (1..=code_changes).collect(),
            items: Vec::new(),
        });
    }
    if tickets > 0 {
        clusters.push(WorkCluster {
            name: "Jira Tasks".to_string(),
            description: "Completed tickets and tasks".to_string(),
            item_numbers: (code_changes + 1..=items.len()).collect(),
            items: Vec::new(),
        });
    }
    clusters
}
