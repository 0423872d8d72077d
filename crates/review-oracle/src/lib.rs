//! LLM oracle client
//!
//! The analysis pipeline treats the language model as a fallible external
//! oracle with a single capability: `ask(prompt) -> answer text`. This
//! crate defines that trait and the provider implementations behind it.
//!
//! Provider selection is "first configured wins" over a fixed preference
//! order (Anthropic, then OpenAI), modeled as an ordered list so adding a
//! provider never touches call sites.

pub mod client;
pub mod providers;

pub use client::{Answer, Oracle, OracleError};
pub use providers::{select_provider, AnthropicProvider, OpenAiProvider};
