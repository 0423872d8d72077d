//! Application configuration
//!
//! Credential keys loaded from the self-review config file. None of the
//! keys is required; accessors return `None` for absent or empty values
//! so callers can decide which stages are available.

use serde::{Deserialize, Serialize};

/// Credentials and API keys for the work sources and LLM providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub personal access token
    #[serde(default)]
    pub github_token: Option<String>,

    /// Jira base URL (e.g. "https://example.atlassian.net")
    #[serde(default)]
    pub jira_url: Option<String>,

    /// Jira account email/username for basic auth
    #[serde(default)]
    pub jira_username: Option<String>,

    /// Jira API token for basic auth
    #[serde(default)]
    pub jira_token: Option<String>,

    /// Anthropic API key (preferred LLM provider)
    #[serde(default)]
    pub anthropic_api_key: Option<String>,

    /// OpenAI API key (fallback LLM provider)
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Load config from CWD first, then home directory, or use an empty config
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("No config file found, nothing is configured");
        Self::default()
    }

    pub fn github_token(&self) -> Option<&str> {
        non_empty(&self.github_token)
    }

    pub fn jira_url(&self) -> Option<&str> {
        non_empty(&self.jira_url)
    }

    pub fn jira_username(&self) -> Option<&str> {
        non_empty(&self.jira_username)
    }

    pub fn jira_token(&self) -> Option<&str> {
        non_empty(&self.jira_token)
    }

    pub fn anthropic_api_key(&self) -> Option<&str> {
        non_empty(&self.anthropic_api_key)
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        non_empty(&self.openai_api_key)
    }

    /// Whether at least one work source (GitHub or Jira) is configured
    pub fn has_any_source(&self) -> bool {
        self.github_token().is_some() || self.jira_url().is_some()
    }

    /// Whether at least one LLM provider key is configured
    pub fn has_llm(&self) -> bool {
        self.anthropic_api_key().is_some() || self.openai_api_key().is_some()
    }
}

/// Empty strings count as "not configured"
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
