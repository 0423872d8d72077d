//! LLM provider implementations
//!
//! Each provider wraps one HTTP chat API behind the [`Oracle`] trait.
//! Models are pinned; this tool asks for short structured answers and
//! does not need frontier context windows.

use crate::client::{Answer, Oracle, OracleError};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4-turbo-preview";

const MAX_TOKENS: u32 = 1024;

/// Anthropic messages API provider
pub struct AnthropicProvider {
    api_key: String,
    http: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl Oracle for AnthropicProvider {
    async fn ask(&self, prompt: &str) -> Result<Answer, OracleError> {
        debug!("Asking {} ({} chars)", self.name(), prompt.len());

        let body = serde_json::json!({
            "model": ANTHROPIC_MODEL,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|source| OracleError::Transport {
                provider: self.name(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(OracleError::Api {
                provider: self.name(),
                status: response.status().as_u16(),
            });
        }

        let message: MessagesResponse =
            response
                .json()
                .await
                .map_err(|source| OracleError::Transport {
                    provider: self.name(),
                    source,
                })?;

        let content: String = message
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();

        if content.is_empty() {
            return Err(OracleError::EmptyResponse {
                provider: self.name(),
            });
        }
        Ok(Answer { content })
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

/// OpenAI chat completions provider
pub struct OpenAiProvider {
    api_key: String,
    http: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Oracle for OpenAiProvider {
    async fn ask(&self, prompt: &str) -> Result<Answer, OracleError> {
        debug!("Asking {} ({} chars)", self.name(), prompt.len());

        let body = serde_json::json!({
            "model": OPENAI_MODEL,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .http
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| OracleError::Transport {
                provider: self.name(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(OracleError::Api {
                provider: self.name(),
                status: response.status().as_u16(),
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|source| OracleError::Transport {
                provider: self.name(),
                source,
            })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(OracleError::EmptyResponse {
                provider: self.name(),
            });
        }
        Ok(Answer { content })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Pick the first configured provider in preference order
///
/// Empty keys count as unconfigured. Returns `OracleError::NotConfigured`
/// when no provider has a key, which is fatal for any oracle-requiring
/// stage.
pub fn select_provider(
    anthropic_api_key: Option<&str>,
    openai_api_key: Option<&str>,
) -> Result<Box<dyn Oracle>, OracleError> {
    type Build = fn(&str) -> Box<dyn Oracle>;
    let candidates: [(Option<&str>, Build); 2] = [
        (anthropic_api_key, |key| Box::new(AnthropicProvider::new(key))),
        (openai_api_key, |key| Box::new(OpenAiProvider::new(key))),
    ];

    for (key, build) in candidates {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            return Ok(build(key));
        }
    }
    Err(OracleError::NotConfigured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_provider_prefers_anthropic() {
        let oracle = select_provider(Some("sk-ant"), Some("sk-oai")).unwrap();
        assert_eq!(oracle.name(), "anthropic");
    }

    #[test]
    fn test_select_provider_falls_back_to_openai() {
        let oracle = select_provider(None, Some("sk-oai")).unwrap();
        assert_eq!(oracle.name(), "openai");
    }

    #[test]
    fn test_select_provider_ignores_empty_keys() {
        let oracle = select_provider(Some(""), Some("sk-oai")).unwrap();
        assert_eq!(oracle.name(), "openai");
    }

    #[test]
    fn test_select_provider_none_configured() {
        let result = select_provider(None, Some(""));
        assert!(matches!(result, Err(OracleError::NotConfigured)));
    }

    #[test]
    fn test_messages_response_text_extraction() {
        let message: MessagesResponse = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "text", "text": "hello " },
                { "type": "text", "text": "world" }
            ]
        }))
        .unwrap();
        let content: String = message
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_chat_response_content_extraction() {
        let chat: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": "hi" } } ]
        }))
        .unwrap();
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);
        assert_eq!(content.as_deref(), Some("hi"));
    }
}
