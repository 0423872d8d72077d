//! Check command: verify connectivity to the configured services

use anyhow::Result;
use review_config::Config;
use review_oracle::select_provider;
use review_sources::{GithubFetcher, JiraFetcher};

pub async fn run(config: &Config) -> Result<()> {
    println!("Checking configured services...");
    println!();

    match config.github_token() {
        None => println!("GitHub: not configured"),
        Some(token) => match check_github(token).await {
            Ok(login) => println!("GitHub: connected as {login}"),
            Err(e) => println!("GitHub: error - {e:#}"),
        },
    }

    match (config.jira_url(), config.jira_username(), config.jira_token()) {
        (Some(url), Some(username), Some(token)) => {
            let fetcher = JiraFetcher::new(url, username, token);
            match fetcher.authenticated_user().await {
                Ok(name) => println!("Jira: connected as {name}"),
                Err(e) => println!("Jira: error - {e:#}"),
            }
        }
        (Some(_), _, _) => println!("Jira: URL configured but username/token missing"),
        _ => println!("Jira: not configured"),
    }

    match select_provider(config.anthropic_api_key(), config.openai_api_key()) {
        Ok(oracle) => println!("LLM: using {} provider", oracle.name()),
        Err(_) => println!("LLM: not configured"),
    }

    Ok(())
}

async fn check_github(token: &str) -> Result<String> {
    let fetcher = GithubFetcher::new(token)?;
    fetcher.authenticated_login().await
}
