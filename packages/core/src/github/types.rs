//! GitHub API data models
//!
//! Serde models for the subset of the REST v3 API that claudeforge consumes,
//! plus issue URL parsing.

use super::GitHubError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a specific issue: owner, repository, and issue number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl IssueRef {
    /// Parse a GitHub issue URL into its owner/repo/number parts
    ///
    /// Accepts `https://github.com/<owner>/<repo>/issues/<number>` as well as
    /// GitHub Enterprise hosts with the same path layout.
    pub fn parse(issue_url: &str) -> Result<Self, GitHubError> {
        let invalid = || GitHubError::InvalidIssueUrl(issue_url.to_string());

        let rest = issue_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(issue_url);

        // URLs pasted from GitHub notifications carry query strings and
        // comment fragments; neither affects which issue is meant.
        let rest = rest.split(['?', '#']).next().unwrap_or(rest);

        // Drop the host, keep the path
        let path = rest.split_once('/').map(|(_, path)| path).ok_or_else(invalid)?;
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();

        if parts.len() < 4 || parts[2] != "issues" {
            return Err(invalid());
        }

        let number: u64 = parts[3].parse().map_err(|_| invalid())?;
        if parts[0].is_empty() || parts[1].is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            owner: parts[0].to_string(),
            repo: parts[1].to_string(),
            number,
        })
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Issue state as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

/// A GitHub issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub body: Option<String>,
    pub html_url: String,
}

/// A GitHub repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub default_branch: String,
    pub clone_url: String,
}

/// A created pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

/// An issue label (used by webhook payloads)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}
