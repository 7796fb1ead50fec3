//! Centralized GitHub error formatting
//!
//! Provides consistent, actionable error messages for GitHub API failures
//! across all CLI commands.

use claudeforge_core::GitHubError;
use console::style;

/// Format GitHub errors with actionable guidance
///
/// Returns a styled, multi-line error message with troubleshooting steps.
pub fn format_github_error(e: &GitHubError) -> String {
    match e {
        GitHubError::InvalidIssueUrl(url) => {
            format!(
                "{}\n\n  Got: {url}\n  {}\n  {}",
                style("Invalid GitHub issue URL").red().bold(),
                "Expected format:",
                style("  https://github.com/<owner>/<repo>/issues/<number>").cyan()
            )
        }
        GitHubError::Auth { status } => {
            format!(
                "{}\n\n  GitHub rejected the request with status {status}.\n  {}\n  {}\n  {}",
                style("GitHub authentication failed").red().bold(),
                "Check that your token is set and has repo scope:",
                style("  export GITHUB_TOKEN=<your-token>").cyan(),
                style("  Tokens: https://github.com/settings/tokens").dim()
            )
        }
        GitHubError::Api {
            status,
            url,
            message,
        } if *status == 404 => {
            format!(
                "{}\n\n  {url} returned 404: {message}\n  {}",
                style("GitHub resource not found").red().bold(),
                "Check the issue URL and that your token can see the repository."
            )
        }
        GitHubError::Api {
            status,
            url,
            message,
        } => {
            format!(
                "{}\n\n  {url} returned {status}: {message}",
                style("GitHub API error").red().bold()
            )
        }
        GitHubError::Http(inner) => {
            format!(
                "{}\n\n  {inner}\n  {}",
                style("Cannot reach GitHub").red().bold(),
                "Check your network connection and any proxy settings."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_shows_expected_format() {
        let error = GitHubError::InvalidIssueUrl("https://github.com/foo".to_string());
        let msg = format_github_error(&error);
        assert!(msg.contains("Invalid GitHub issue URL"));
        assert!(msg.contains("issues/<number>"));
    }

    #[test]
    fn auth_error_suggests_token_export() {
        let error = GitHubError::Auth { status: 401 };
        let msg = format_github_error(&error);
        assert!(msg.contains("401"));
        assert!(msg.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn not_found_gets_dedicated_message() {
        let error = GitHubError::from_status(
            404,
            "https://api.github.com/repos/o/r/issues/1".to_string(),
            "Not Found".to_string(),
        );
        let msg = format_github_error(&error);
        assert!(msg.contains("not found"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn other_api_errors_include_status_and_message() {
        let error = GitHubError::from_status(
            422,
            "https://api.github.com/repos/o/r/pulls".to_string(),
            "Validation Failed".to_string(),
        );
        let msg = format_github_error(&error);
        assert!(msg.contains("422"));
        assert!(msg.contains("Validation Failed"));
    }
}
