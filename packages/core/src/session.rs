//! Claude Code session handling
//!
//! Composes the instruction prompt for a task and runs the external coding
//! tool inside the cloned repository. Prompt composition is deterministic:
//! identical inputs always produce byte-identical output, and all four
//! sections (preamble, instruction, issue context, repository context) are
//! always present in the same order.

use crate::github::{Issue, Repository};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Extra time allowed beyond the session timeout for tool cleanup
const TIMEOUT_BUFFER_SECS: u64 = 60;

/// Errors from running a coding session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to launch '{binary}': {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },

    #[error("session timed out after {timeout_secs} seconds")]
    TimedOut { timeout_secs: u64 },

    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The inputs assembled for one session, gathered once per invocation
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub instruction: String,
    pub issue: Issue,
    pub repository: Repository,
}

/// Captured output of a completed tool invocation
#[derive(Debug, Clone)]
pub struct SessionOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Interpretation of a session's output
#[derive(Debug, Clone)]
pub struct SessionAnalysis {
    pub success: bool,
    pub summary: String,
    pub errors: Vec<String>,
}

/// Compose the full instruction prompt for a task
///
/// Section order is fixed: role preamble, primary instruction, issue context,
/// repository context, task checklist. Optional fields render as placeholders
/// so no section is ever omitted.
pub fn compose_prompt(context: &TaskContext) -> String {
    let issue = &context.issue;
    let repo = &context.repository;

    let body = issue
        .body
        .as_deref()
        .filter(|b| !b.is_empty())
        .unwrap_or("No description provided.");
    let description = repo
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("N/A");
    let language = repo
        .language
        .as_deref()
        .filter(|l| !l.is_empty())
        .unwrap_or("N/A");

    let parts = [
        "You are an autonomous software development assistant working on a GitHub repository."
            .to_string(),
        String::new(),
        format!("Primary Instruction: {}", context.instruction),
        String::new(),
        "GitHub Issue Context:".to_string(),
        format!("Title: {}", issue.title),
        format!("Number: #{}", issue.number),
        format!("State: {}", issue.state),
        String::new(),
        "Issue Description:".to_string(),
        body.to_string(),
        String::new(),
        "Repository Context:".to_string(),
        format!("Name: {}", repo.full_name),
        format!("Description: {description}"),
        format!("Language: {language}"),
        format!("Default Branch: {}", repo.default_branch),
        String::new(),
        "Your Task:".to_string(),
        "1. Analyze the codebase and understand the current implementation".to_string(),
        "2. Implement the requested changes or fixes".to_string(),
        "3. Ensure code quality and follow existing patterns".to_string(),
        "4. Write or update tests as appropriate".to_string(),
        "5. Make sure the changes work correctly".to_string(),
        String::new(),
        "Work autonomously and systematically. Create a plan and execute it step by step."
            .to_string(),
        "Focus on delivering a complete, working solution.".to_string(),
    ];

    parts.join("\n")
}

/// Run a coding session in the given repository checkout
///
/// The prompt is passed verbatim as the tool's final argument. The tool runs
/// non-interactively with the configured timeout exported in its environment;
/// a watchdog kills it after the timeout plus a fixed cleanup buffer.
pub async fn run_session(
    binary: &str,
    repo_path: &Path,
    prompt: &str,
    timeout_secs: u64,
) -> Result<SessionOutput, SessionError> {
    info!("starting coding session in {}", repo_path.display());

    let child = Command::new(binary)
        .arg("--")
        .arg(prompt)
        .current_dir(repo_path)
        .env("CLAUDE_CODE_NON_INTERACTIVE", "1")
        .env("CLAUDE_CODE_TIMEOUT", timeout_secs.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| SessionError::Spawn {
            binary: binary.to_string(),
            source,
        })?;

    let deadline = Duration::from_secs(timeout_secs + TIMEOUT_BUFFER_SECS);
    let result = tokio::time::timeout(deadline, child.wait_with_output()).await;

    let output = match result {
        Ok(output) => output?,
        Err(_) => {
            warn!("session exceeded {timeout_secs}s; terminating");
            return Err(SessionError::TimedOut { timeout_secs });
        }
    };

    let session = SessionOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    info!("session completed with exit code {:?}", session.exit_code);
    if !session.stdout.is_empty() {
        debug!("session stdout: {}", session.stdout);
    }
    if !session.stderr.is_empty() {
        warn!("session stderr: {}", session.stderr);
    }

    Ok(session)
}

/// Interpret the output of a finished session
pub fn analyze_output(output: &SessionOutput) -> SessionAnalysis {
    let success = output.exit_code == Some(0);

    let summary = if success {
        "Claude Code session completed successfully".to_string()
    } else {
        format!(
            "Claude Code session failed with exit code {}",
            output
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown (killed)".to_string())
        )
    };

    let mut errors = Vec::new();
    if !success && !output.stderr.trim().is_empty() {
        errors.push(output.stderr.trim().to_string());
    }

    SessionAnalysis {
        success,
        summary,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::IssueState;

    fn context() -> TaskContext {
        TaskContext {
            instruction: "Fix the login bug".to_string(),
            issue: Issue {
                number: 42,
                title: "Login fails on Safari".to_string(),
                state: IssueState::Open,
                body: Some("Steps to reproduce...".to_string()),
                html_url: "https://github.com/octo/app/issues/42".to_string(),
            },
            repository: Repository {
                full_name: "octo/app".to_string(),
                description: Some("An app".to_string()),
                language: Some("Rust".to_string()),
                default_branch: "main".to_string(),
                clone_url: "https://github.com/octo/app.git".to_string(),
            },
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let ctx = context();
        assert_eq!(compose_prompt(&ctx), compose_prompt(&ctx));
    }

    #[test]
    fn prompt_sections_appear_in_fixed_order() {
        let prompt = compose_prompt(&context());
        let preamble = prompt.find("You are an autonomous").unwrap();
        let instruction = prompt.find("Primary Instruction:").unwrap();
        let issue = prompt.find("GitHub Issue Context:").unwrap();
        let repo = prompt.find("Repository Context:").unwrap();
        let task = prompt.find("Your Task:").unwrap();
        assert!(preamble < instruction);
        assert!(instruction < issue);
        assert!(issue < repo);
        assert!(repo < task);
    }

    #[test]
    fn prompt_keeps_headers_for_empty_optionals() {
        let mut ctx = context();
        ctx.issue.body = None;
        ctx.repository.description = None;
        ctx.repository.language = Some(String::new());

        let prompt = compose_prompt(&ctx);
        assert!(prompt.contains("Issue Description:\nNo description provided."));
        assert!(prompt.contains("Description: N/A"));
        assert!(prompt.contains("Language: N/A"));
        assert!(prompt.contains("Repository Context:"));
    }

    #[test]
    fn prompt_embeds_instruction_verbatim() {
        let prompt = compose_prompt(&context());
        assert!(prompt.contains("Primary Instruction: Fix the login bug"));
        assert!(prompt.contains("Number: #42"));
        assert!(prompt.contains("State: open"));
        assert!(prompt.contains("Default Branch: main"));
    }

    #[test]
    fn analyze_maps_zero_exit_to_success() {
        let output = SessionOutput {
            exit_code: Some(0),
            stdout: "done".to_string(),
            stderr: String::new(),
        };
        let analysis = analyze_output(&output);
        assert!(analysis.success);
        assert!(analysis.errors.is_empty());
    }

    #[test]
    fn analyze_collects_stderr_on_failure() {
        let output = SessionOutput {
            exit_code: Some(2),
            stdout: String::new(),
            stderr: "boom\n".to_string(),
        };
        let analysis = analyze_output(&output);
        assert!(!analysis.success);
        assert!(analysis.summary.contains("exit code 2"));
        assert_eq!(analysis.errors, vec!["boom".to_string()]);
    }

    #[test]
    fn analyze_handles_killed_process() {
        let output = SessionOutput {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        let analysis = analyze_output(&output);
        assert!(!analysis.success);
        assert!(analysis.summary.contains("unknown"));
    }

    #[tokio::test]
    async fn run_session_reports_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_session("claudeforge-no-such-tool", dir.path(), "hi", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Spawn { .. }));
    }
}
