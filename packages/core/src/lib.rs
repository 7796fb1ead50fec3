//! claudeforge-core - Core library for claudeforge
//!
//! This crate provides the building blocks for autonomous development
//! sessions against GitHub issues:
//! - Configuration management (JSONC config file + environment overrides)
//! - GitHub REST API client (issues, repositories, pull requests)
//! - Git workspace operations (clone, branch, commit, push)
//! - Claude Code session handling (prompt composition + tool invocation)
//! - Notifications (Discord webhook, SMTP email)
//! - Webhook signature verification for daemon mode
//! - The orchestrator tying the pipeline together

pub mod config;
pub mod github;
pub mod notify;
pub mod orchestrator;
pub mod session;
pub mod webhook;
pub mod workspace;

// Core types
pub use config::{Config, ConfigError, load_config, load_config_or_default, save_config};
pub use github::{GitHubClient, GitHubError, Issue, IssueRef, IssueState, PullRequest, Repository};
pub use orchestrator::{Orchestrator, SessionRequest, SessionResult};
pub use session::{SessionAnalysis, SessionError, TaskContext, compose_prompt};
pub use workspace::{GitError, GitWorkspace};

/// Get the version of claudeforge-core
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_cargo_manifest() {
        assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
        assert!(!get_version().is_empty());
    }
}
