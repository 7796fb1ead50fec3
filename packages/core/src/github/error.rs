//! GitHub error types

use thiserror::Error;

/// Errors from GitHub API operations
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("invalid GitHub issue URL: {0}")]
    InvalidIssueUrl(String),

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    #[error("GitHub authentication failed (status {status}); check your token")]
    Auth { status: u16 },
}

impl GitHubError {
    /// Build an error from a non-success API response
    pub fn from_status(status: u16, url: String, message: String) -> Self {
        match status {
            401 | 403 => GitHubError::Auth { status },
            _ => GitHubError::Api {
                status,
                url,
                message,
            },
        }
    }
}
