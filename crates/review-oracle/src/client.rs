//! Oracle trait and error definitions

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the oracle collaborator
///
/// `NotConfigured` is fatal for any stage that needs the oracle; the
/// other variants are recoverable and trigger the callers' deterministic
/// fallback tiers.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("no LLM provider configured")]
    NotConfigured,

    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API returned HTTP {status}")]
    Api { provider: &'static str, status: u16 },

    #[error("{provider} returned no content")]
    EmptyResponse { provider: &'static str },
}

/// A raw oracle answer
#[derive(Debug, Clone)]
pub struct Answer {
    pub content: String,
}

/// Uniform capability interface over LLM providers
///
/// Implementations must be `Send + Sync` so a boxed oracle can be shared
/// across the pipeline stages.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Send one prompt, get the model's text back
    async fn ask(&self, prompt: &str) -> Result<Answer, OracleError>;

    /// Short provider name for logs and the check command
    fn name(&self) -> &'static str;
}
