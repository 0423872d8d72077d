//! Work analysis pipeline stages
//!
//! Three stages, each leaning on the LLM oracle for the semantic part and
//! carrying a deterministic, oracle-independent fallback so the pipeline
//! never blocks on external-service failure:
//!
//! - [`date_range`] turns a user-supplied date expression into a concrete
//!   interval
//! - [`cluster`] groups normalized work items into named thematic clusters
//! - [`summarize`] condenses clusters into a short accomplishment list
//!
//! The fallbacks are pure functions of their inputs and unit-tested
//! without network access.

pub mod cluster;
pub mod date_range;
pub mod summarize;

pub use cluster::{cluster_work, resolve_cluster_items, WorkCluster};
pub use date_range::{resolve_date_range, Confidence, DateParseError, DateRange, DateSource};
pub use summarize::summarize_accomplishments;

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use review_oracle::{Answer, Oracle, OracleError};
    use std::sync::{Arc, Mutex};

    /// Scripted oracle for tests: a canned answer or a guaranteed error,
    /// plus a call counter.
    pub struct MockOracle {
        response: Option<String>,
        calls: Arc<Mutex<usize>>,
    }

    impl MockOracle {
        pub fn answering(content: &str) -> Self {
            Self {
                response: Some(content.to_string()),
                calls: Arc::new(Mutex::new(0)),
            }
        }

        pub fn failing() -> Self {
            Self {
                response: None,
                calls: Arc::new(Mutex::new(0)),
            }
        }

        pub fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Oracle for MockOracle {
        async fn ask(&self, _prompt: &str) -> Result<Answer, OracleError> {
            *self.calls.lock().unwrap() += 1;
            match &self.response {
                Some(content) => Ok(Answer {
                    content: content.clone(),
                }),
                None => Err(OracleError::NotConfigured),
            }
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }
}
