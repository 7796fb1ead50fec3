//! Run command implementation
//!
//! Executes a full claudeforge session for a GitHub issue: fetch metadata,
//! clone, run Claude Code, commit, push, and open a pull request.

use crate::output::CommandSpinner;
use anyhow::Result;
use clap::Args;
use claudeforge_core::orchestrator::{Orchestrator, SessionRequest};
use claudeforge_core::Config;
use console::style;

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// GitHub issue URL
    #[arg(short = 'u', long)]
    pub issue_url: String,

    /// Custom instruction for Claude
    #[arg(short = 'i', long)]
    pub instruction: String,

    /// Custom branch name (auto-generated if not provided)
    #[arg(short = 'b', long)]
    pub branch_name: Option<String>,

    /// Don't create a pull request
    #[arg(long)]
    pub no_pr: bool,

    /// Create a draft pull request
    #[arg(long)]
    pub draft_pr: bool,
}

/// Run a claudeforge session for a specific GitHub issue
pub async fn cmd_run(args: &RunArgs, config: Config, quiet: bool) -> Result<()> {
    if !quiet {
        println!("{}", style("Starting claudeforge session").green());
        println!("Issue URL: {}", args.issue_url);
        println!("Instruction: {}", args.instruction);
    }

    let mut orchestrator = Orchestrator::new(config)?;

    let spinner = CommandSpinner::new_maybe("Running claudeforge session...", quiet);
    let result = orchestrator
        .run_session(SessionRequest {
            issue_url: args.issue_url.clone(),
            instruction: args.instruction.clone(),
            branch_name: args.branch_name.clone(),
            create_pr: !args.no_pr,
            draft_pr: args.draft_pr,
        })
        .await;
    orchestrator.cleanup().await;

    if result.success {
        spinner.success("Session completed");
        if !quiet {
            println!(
                "{}",
                style("\u{2713} Session completed successfully!").green()
            );
            if let Some(pr_url) = &result.pr_url {
                println!("Pull Request: {pr_url}");
            }
            if let Some(message) = &result.message {
                println!("{}", style(message).dim());
            }
            if let Some(duration) = result.duration_seconds {
                println!("{}", style(format!("Duration: {duration:.1}s")).dim());
            }
        }
        Ok(())
    } else {
        spinner.fail("Session failed");
        let reason = result.error.as_deref().unwrap_or("Unknown error");
        eprintln!(
            "{} {}",
            style("\u{2717} Session failed:").red().bold(),
            reason
        );
        std::process::exit(1);
    }
}
