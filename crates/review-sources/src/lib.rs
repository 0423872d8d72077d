//! Work item fetchers for GitHub and Jira
//!
//! This crate normalizes completed work from two source-of-record systems
//! into a common [`WorkItem`] shape: merged pull requests from GitHub and
//! done tickets from Jira.
//!
//! # Failure semantics
//!
//! Both fetchers degrade to an empty list on any upstream failure
//! (authentication, rate limiting, network, malformed responses). A
//! single unreachable source must not abort the whole fetch, so callers
//! cannot distinguish "no work done" from "source unreachable" here; the
//! failure is logged at warn level instead.

pub mod github;
pub mod jira;
pub mod pagination;
pub mod types;

pub use github::GithubFetcher;
pub use jira::JiraFetcher;
pub use pagination::collect_pages;
pub use types::{sort_most_recent_first, WorkItem, WorkItemKind};
