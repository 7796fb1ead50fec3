//! Session orchestration
//!
//! Drives a complete claudeforge session: fetch issue and repository
//! metadata, clone the repository onto a feature branch, compose the
//! instruction prompt, run the coding tool, then commit, push, open a pull
//! request, and notify. Fail-fast: the first error aborts the pipeline and is
//! reported; there is no retry or rollback.

use crate::config::Config;
use crate::github::{GitHubClient, GitHubError, Issue, IssueRef, Repository};
use crate::notify::{NotificationManager, SessionReport, SessionStatus};
use crate::session::{self, TaskContext};
use crate::workspace::GitWorkspace;
use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

/// Parameters for one session
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub issue_url: String,
    pub instruction: String,
    pub branch_name: Option<String>,
    pub create_pr: bool,
    pub draft_pr: bool,
}

/// Outcome of a session
#[derive(Debug, Clone, Default)]
pub struct SessionResult {
    pub success: bool,
    pub issue_url: String,
    pub instruction: String,
    pub branch_name: Option<String>,
    pub pr_url: Option<String>,
    pub changes_committed: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub duration_seconds: Option<f64>,
}

/// Metadata gathered by `analyze` without running a session
#[derive(Debug, Clone)]
pub struct IssueAnalysis {
    pub issue: Issue,
    pub repository: Repository,
}

/// Main orchestrator for claudeforge operations
pub struct Orchestrator {
    config: Config,
    github: GitHubClient,
    notifications: NotificationManager,
    current_repo_path: Option<PathBuf>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Result<Self, GitHubError> {
        let github = GitHubClient::new(&config.github.api_url, &config.github.token)?;
        let notifications = NotificationManager::new(&config.notifications);
        Ok(Self {
            config,
            github,
            notifications,
            current_repo_path: None,
        })
    }

    /// Run a complete session
    ///
    /// Errors never propagate: they are captured in the result (and sent as
    /// an `error` notification) so the caller can map them to an exit status.
    pub async fn run_session(&mut self, request: SessionRequest) -> SessionResult {
        let started_at = Instant::now();
        let mut result = SessionResult {
            issue_url: request.issue_url.clone(),
            instruction: request.instruction.clone(),
            ..Default::default()
        };

        match self.run_pipeline(&request, &mut result).await {
            Ok(()) => {
                result.duration_seconds = Some(started_at.elapsed().as_secs_f64());
                info!(
                    "claudeforge session completed in {:.1}s",
                    result.duration_seconds.unwrap_or_default()
                );
            }
            Err(e) => {
                error!("claudeforge session failed: {e:#}");
                result.error = Some(format!("{e:#}"));
                result.duration_seconds = Some(started_at.elapsed().as_secs_f64());

                self.notifications
                    .notify_session_status(
                        SessionStatus::Error,
                        &request.issue_url,
                        &SessionReport {
                            timestamp: Utc::now().to_rfc3339(),
                            summary: Some(format!("Session failed with error: {e:#}")),
                            errors: vec![format!("{e:#}")],
                            ..Default::default()
                        },
                    )
                    .await;
            }
        }

        result
    }

    async fn run_pipeline(
        &mut self,
        request: &SessionRequest,
        result: &mut SessionResult,
    ) -> Result<()> {
        info!("starting claudeforge session for {}", request.issue_url);

        info!("fetching GitHub issue and repository data");
        let issue_ref = IssueRef::parse(&request.issue_url)?;
        let issue = self.github.get_issue(&issue_ref).await?;
        let repository = self
            .github
            .get_repository(&issue_ref.owner, &issue_ref.repo)
            .await?;

        let session_ts = Utc::now().timestamp();
        let branch_name = request
            .branch_name
            .clone()
            .unwrap_or_else(|| derive_branch_name(issue_ref.number, session_ts));

        info!("setting up local repository");
        let clone_dir = PathBuf::from(&self.config.workspace.clone_dir);
        tokio::fs::create_dir_all(&clone_dir)
            .await
            .with_context(|| format!("failed to create clone dir {}", clone_dir.display()))?;

        let repo_path = clone_dir.join(format!("{}-{}", issue_ref.repo, session_ts));
        self.current_repo_path = Some(repo_path.clone());

        let workspace = GitWorkspace::clone(
            &repository.clone_url,
            &self.config.github.token,
            &repo_path,
            &repository.default_branch,
        )
        .await?;

        workspace
            .create_branch(&branch_name, &repository.default_branch)
            .await?;

        let context = TaskContext {
            instruction: request.instruction.clone(),
            issue: issue.clone(),
            repository: repository.clone(),
        };
        let prompt = session::compose_prompt(&context);

        self.notifications
            .notify_session_status(
                SessionStatus::Started,
                &request.issue_url,
                &SessionReport {
                    timestamp: Utc::now().to_rfc3339(),
                    branch: Some(branch_name.clone()),
                    summary: Some(format!(
                        "Started working on issue #{}: {}",
                        issue_ref.number, issue.title
                    )),
                    ..Default::default()
                },
            )
            .await;

        info!("running Claude Code session");
        let output = session::run_session(
            &self.config.claude.binary,
            workspace.path(),
            &prompt,
            self.config.claude.timeout_secs,
        )
        .await?;
        let analysis = session::analyze_output(&output);

        if !analysis.success {
            error!("Claude Code session failed: {}", analysis.summary);
            self.notifications
                .notify_session_status(
                    SessionStatus::Failed,
                    &request.issue_url,
                    &SessionReport {
                        timestamp: Utc::now().to_rfc3339(),
                        summary: Some("Claude Code session failed".to_string()),
                        errors: analysis.errors.clone(),
                        ..Default::default()
                    },
                )
                .await;
            return Err(anyhow!("{}", analysis.summary));
        }

        if !workspace.has_changes().await? {
            info!("no changes detected");
            result.success = true;
            result.changes_committed = false;
            result.message = Some("No changes were made to the repository".to_string());

            self.notifications
                .notify_session_status(
                    SessionStatus::Completed,
                    &request.issue_url,
                    &SessionReport {
                        timestamp: Utc::now().to_rfc3339(),
                        summary: Some("Session completed but no changes were made".to_string()),
                        ..Default::default()
                    },
                )
                .await;
            return Ok(());
        }

        info!("changes detected, committing and pushing");
        workspace
            .commit_all(&commit_message(&request.instruction, issue_ref.number))
            .await?;
        workspace.push(&branch_name).await?;

        let mut pr_url = None;
        if request.create_pr && self.config.workspace.auto_create_pr {
            info!("creating pull request");
            let pr = self
                .github
                .create_pull_request(
                    &issue_ref.owner,
                    &issue_ref.repo,
                    &pr_title(&request.instruction),
                    &pr_body(
                        &request.issue_url,
                        &request.instruction,
                        &analysis.summary,
                        issue_ref.number,
                    ),
                    &branch_name,
                    &repository.default_branch,
                    request.draft_pr || self.config.workspace.draft_pr,
                )
                .await?;
            info!("pull request created: {}", pr.html_url);

            self.github
                .add_issue_comment(
                    &issue_ref,
                    &format!(
                        "\u{1f916} ClaudeForge has created a pull request to address this issue: {}",
                        pr.html_url
                    ),
                )
                .await?;

            pr_url = Some(pr.html_url);
        }

        result.success = true;
        result.changes_committed = true;
        result.branch_name = Some(branch_name.clone());
        result.pr_url = pr_url.clone();

        self.notifications
            .notify_session_status(
                SessionStatus::Success,
                &request.issue_url,
                &SessionReport {
                    timestamp: Utc::now().to_rfc3339(),
                    summary: Some(format!(
                        "Successfully completed work on issue #{}",
                        issue_ref.number
                    )),
                    pr_url,
                    branch: Some(branch_name),
                    ..Default::default()
                },
            )
            .await;

        Ok(())
    }

    /// Analyze a GitHub issue without running a session
    pub async fn analyze_issue(&self, issue_url: &str) -> Result<IssueAnalysis, GitHubError> {
        let issue_ref = IssueRef::parse(issue_url)?;
        let issue = self.github.get_issue(&issue_ref).await?;
        let repository = self
            .github
            .get_repository(&issue_ref.owner, &issue_ref.repo)
            .await?;
        Ok(IssueAnalysis { issue, repository })
    }

    /// Remove the temporary repository checkout, if any
    pub async fn cleanup(&mut self) {
        if let Some(path) = self.current_repo_path.take()
            && path.exists()
        {
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => info!("cleaned up temporary repository: {}", path.display()),
                Err(e) => warn!("failed to clean up repository {}: {e}", path.display()),
            }
        }
    }
}

/// Default branch name for a session: `claudeforge-issue-<n>-<unix-ts>`
pub fn derive_branch_name(issue_number: u64, unix_ts: i64) -> String {
    format!("claudeforge-issue-{issue_number}-{unix_ts}")
}

/// Commit message for session changes
pub fn commit_message(instruction: &str, issue_number: u64) -> String {
    format!("ClaudeForge: {instruction}\n\nResolves #{issue_number}")
}

/// Pull request title for session changes
pub fn pr_title(instruction: &str) -> String {
    format!("ClaudeForge: {instruction}")
}

/// Pull request body for session changes
pub fn pr_body(issue_url: &str, instruction: &str, summary: &str, issue_number: u64) -> String {
    format!(
        "## ClaudeForge Automated Changes\n\
         \n\
         **Issue:** {issue_url}\n\
         **Instruction:** {instruction}\n\
         \n\
         ### Summary\n\
         {summary}\n\
         \n\
         ### Changes Made\n\
         - Automated implementation using Claude Code\n\
         - Resolves issue #{issue_number}\n\
         \n\
         ---\n\
         *This pull request was automatically created by ClaudeForge*"
    )
}
