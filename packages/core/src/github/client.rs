//! GitHub REST API client
//!
//! Thin wrapper over the v3 REST API covering exactly what a claudeforge
//! session needs: fetching issue and repository metadata, opening pull
//! requests, and commenting on issues.

use super::error::GitHubError;
use super::types::{Issue, IssueRef, PullRequest, Repository};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Client for GitHub API operations
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl GitHubClient {
    /// Create a client for the given API base URL and token
    pub fn new(api_url: &str, token: &str) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("claudeforge/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Fetch issue details
    pub async fn get_issue(&self, issue: &IssueRef) -> Result<Issue, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}",
            self.api_url, issue.owner, issue.repo, issue.number
        );
        self.get_json(&url).await
    }

    /// Fetch repository details
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, GitHubError> {
        let url = format!("{}/repos/{owner}/{repo}", self.api_url);
        self.get_json(&url).await
    }

    /// Create a pull request
    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        head_branch: &str,
        base_branch: &str,
        draft: bool,
    ) -> Result<PullRequest, GitHubError> {
        let url = format!("{}/repos/{owner}/{repo}/pulls", self.api_url);
        let payload = json!({
            "title": title,
            "body": body,
            "head": head_branch,
            "base": base_branch,
            "draft": draft,
        });
        self.post_json(&url, &payload).await
    }

    /// Add a comment to an issue
    pub async fn add_issue_comment(
        &self,
        issue: &IssueRef,
        comment: &str,
    ) -> Result<(), GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, issue.owner, issue.repo, issue.number
        );
        let payload = json!({ "body": comment });
        let _: serde_json::Value = self.post_json(&url, &payload).await?;
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode(url, response).await
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<T, GitHubError> {
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await?;
        Self::decode(url, response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, GitHubError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.to_string());

        Err(GitHubError::from_status(
            status.as_u16(),
            url.to_string(),
            message,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_normalizes_trailing_slash_in_api_url() {
        let client = GitHubClient::new("https://api.github.com/", "t").unwrap();
        assert_eq!(client.api_url, "https://api.github.com");
    }

    #[test]
    fn api_error_body_tolerates_missing_message() {
        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
    }
}
