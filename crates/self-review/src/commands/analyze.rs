//! Analyze command: cluster the latest snapshot and generate a summary
//!
//! Pipeline: snapshot gate, oracle gate, clustering, cluster item
//! resolution, summarization, report write. The clustering and
//! summarization stages never fail outright -- they fall back to
//! deterministic results -- so once the gates pass, a report is always
//! written.

use anyhow::{Context, Result};
use chrono::Local;
use review_analysis::{cluster_work, resolve_cluster_items, summarize_accomplishments};
use review_config::Config;
use review_oracle::select_provider;
use std::fs;
use std::path::Path;

use crate::report::{self, REPORT_PREFIX};
use crate::snapshot::{self, Snapshot};

pub async fn run(config: &Config, display: Option<&str>) -> Result<()> {
    if let Some(file) = display {
        return display_analysis_file(Path::new(file));
    }

    println!("Analyzing recent work...");
    println!();

    let Some(path) = snapshot::latest_snapshot(Path::new("."))? else {
        anyhow::bail!("No work data found. Run 'self-review fetch' first.");
    };
    println!("Using data from: {}", path.display());

    let snapshot = Snapshot::load(&path)?;
    println!(
        "Found {} GitHub PRs and {} Jira tickets",
        snapshot.code_change_items.len(),
        snapshot.ticket_items.len()
    );
    println!();

    let oracle = select_provider(config.anthropic_api_key(), config.openai_api_key())
        .map_err(|_| {
            anyhow::anyhow!(
                "No LLM API keys configured. Add an Anthropic or OpenAI key \
                 to ~/.config/self-review/config.toml first."
            )
        })?;

    println!("Clustering work items...");
    let all_items = snapshot.combined_items();
    let mut clusters = cluster_work(&all_items, oracle.as_ref()).await;
    println!("Identified {} work clusters", clusters.len());

    resolve_cluster_items(&mut clusters, &all_items);

    println!("Generating accomplishment summary...");
    let accomplishments = summarize_accomplishments(&clusters, oracle.as_ref()).await;

    let now = Local::now();
    let content = report::render(&snapshot.metadata, &clusters, &accomplishments, now);
    let filename = format!(
        "{REPORT_PREFIX}{}.md",
        now.format(snapshot::TIMESTAMP_FORMAT)
    );
    fs::write(&filename, &content)
        .with_context(|| format!("Failed to write report file: {filename}"))?;

    println!();
    println!("Analysis saved to {filename}");
    println!(
        "{} clusters identified with {} key accomplishments",
        clusters.len(),
        accomplishments.len()
    );
    println!();
    print_report(&content);
    Ok(())
}

fn display_analysis_file(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("File not found: {}", path.display()))?;
    print_report(&content);
    Ok(())
}

fn print_report(content: &str) {
    let rule = "=".repeat(50);
    println!("{rule}");
    println!("ANALYSIS RESULTS");
    println!("{rule}");
    println!();
    println!("{content}");
}
