//! GitHub integration
//!
//! Issue URL parsing, REST API client, and the data models shared with the
//! orchestrator and webhook handling.

mod client;
mod error;
mod types;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use types::{Issue, IssueRef, IssueState, Label, PullRequest, Repository};
