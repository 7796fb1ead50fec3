//! Analyze command implementation
//!
//! Fetches and displays issue and repository metadata without running a
//! session.

use crate::output::format_github_error;
use anyhow::{Result, anyhow};
use clap::Args;
use claudeforge_core::Config;
use claudeforge_core::orchestrator::Orchestrator;
use console::style;

/// Arguments for the analyze command
#[derive(Args)]
pub struct AnalyzeArgs {
    /// GitHub issue URL
    pub issue_url: String,
}

/// Analyze a GitHub issue without running a session
pub async fn cmd_analyze(args: &AnalyzeArgs, config: Config, quiet: bool) -> Result<()> {
    if !quiet {
        println!("{}", style("Analyzing GitHub issue").blue());
        println!("URL: {}", args.issue_url);
    }

    let orchestrator = Orchestrator::new(config)?;
    let analysis = orchestrator
        .analyze_issue(&args.issue_url)
        .await
        .map_err(|e| anyhow!("{}", format_github_error(&e)))?;

    println!();
    println!("{}", style("Issue Analysis").green());
    println!("Title: {}", analysis.issue.title);
    println!("State: {}", analysis.issue.state);
    println!("Repository: {}", analysis.repository.full_name);
    println!(
        "Language: {}",
        analysis.repository.language.as_deref().unwrap_or("Unknown")
    );
    println!("Default Branch: {}", analysis.repository.default_branch);

    if let Some(description) = analysis.issue.body.as_deref().filter(|b| !b.is_empty()) {
        println!();
        println!("Description:\n{}", truncate(description, 200));
    }

    Ok(())
}

/// Truncate text to `max` characters, appending an ellipsis when cut
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}
