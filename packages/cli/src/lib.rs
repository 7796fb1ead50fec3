//! claudeforge CLI - Autonomous development tool using Claude Code
//!
//! This module contains the shared CLI implementation: argument parsing,
//! config loading, and command dispatch.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use claudeforge_core::config::{
    self, display_validation_error, display_validation_warning, validate_config,
};
use claudeforge_core::{Config, get_version};
use console::style;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Autonomous development tool using Claude Code
#[derive(Parser)]
#[command(name = "claudeforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Autonomous development tool using Claude Code", long_about = None)]
#[command(after_help = get_banner())]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a claudeforge session for a specific GitHub issue
    Run(commands::RunArgs),
    /// Analyze a GitHub issue without running a session
    Analyze(commands::AnalyzeArgs),
    /// Run claudeforge as a daemon with webhook support
    Daemon(commands::DaemonArgs),
    /// Manage configuration
    Config(commands::ConfigArgs),
}

/// Get the ASCII banner for help display
fn get_banner() -> &'static str {
    r#"
       _                 _       __
   ___| | __ _ _   _  __| | ___ / _| ___  _ __ __ _  ___
  / __| |/ _` | | | |/ _` |/ _ \ |_ / _ \| '__/ _` |/ _ \
 | (__| | (_| | |_| | (_| |  __/  _| (_) | | | (_| |  __/
  \___|_|\__,_|\__,_|\__,_|\___|_|  \___/|_|  \__, |\___|
                                              |___/
"#
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "claudeforge=warn,claudeforge_core=warn",
        1 => "claudeforge=info,claudeforge_core=info",
        _ => "claudeforge=debug,claudeforge_core=debug",
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    // RUST_LOG takes precedence over the -v flag
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load config (explicit path or platform default with env overrides)
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => {
            if cli.verbose > 0
                && let Some(path) = config_path_for_display(cli.config.as_deref())
            {
                eprintln!(
                    "{} Config loaded from: {}",
                    style("[info]").cyan(),
                    path.display()
                );
            }
            config
        }
        Err(e) => {
            // Display rich error for invalid config
            eprintln!("{} Configuration error", style("Error:").red().bold());
            eprintln!();
            eprintln!("  {e}");
            eprintln!();
            eprintln!(
                "  {} Check the config file for syntax errors or unknown fields.",
                style("Tip:").cyan()
            );
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Run(args)) => {
            ensure_valid_config(&config, cli.quiet)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_run(&args, config, cli.quiet))
        }
        Some(Commands::Analyze(args)) => {
            ensure_valid_config(&config, cli.quiet)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_analyze(&args, config, cli.quiet))
        }
        Some(Commands::Daemon(args)) => {
            ensure_valid_config(&config, cli.quiet)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_daemon(&args, config, cli.quiet))
        }
        Some(Commands::Config(args)) => commands::cmd_config(&args, &config, cli.quiet),
        None => {
            if !cli.quiet {
                print_help_hint();
            }
            Ok(())
        }
    }
}

fn load_config(explicit_path: Option<&std::path::Path>) -> Result<Config, config::ConfigError> {
    match explicit_path {
        Some(path) => config::load_config_from(path),
        None => config::load_config_or_default(),
    }
}

fn config_path_for_display(explicit_path: Option<&std::path::Path>) -> Option<PathBuf> {
    explicit_path
        .map(PathBuf::from)
        .or_else(config::paths::get_config_path)
}

/// Validate config before running a command that needs GitHub access
///
/// Fatal errors abort with a styled message; warnings are printed unless
/// quiet is set.
fn ensure_valid_config(config: &Config, quiet: bool) -> Result<()> {
    match validate_config(config) {
        Ok(warnings) => {
            if !quiet {
                for warning in &warnings {
                    display_validation_warning(warning);
                }
            }
            Ok(())
        }
        Err(error) => {
            display_validation_error(&error);
            std::process::exit(1);
        }
    }
}

fn print_help_hint() {
    println!(
        "{} {}",
        style("claudeforge").cyan().bold(),
        style(get_version()).dim()
    );
    println!();
    println!("Run {} for available commands.", style("--help").green());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_args_are_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_command_parses_issue_url_and_instruction() {
        let cli = Cli::parse_from([
            "claudeforge",
            "run",
            "--issue-url",
            "https://github.com/a/b/issues/1",
            "--instruction",
            "Fix it",
        ]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.issue_url, "https://github.com/a/b/issues/1");
                assert_eq!(args.instruction, "Fix it");
                assert!(!args.no_pr);
                assert!(!args.draft_pr);
                assert!(args.branch_name.is_none());
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn verbosity_maps_to_log_filter() {
        assert!(log_filter(0).contains("warn"));
        assert!(log_filter(1).contains("info"));
        assert!(log_filter(3).contains("debug"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["claudeforge", "daemon", "--quiet", "--no-color"]);
        assert!(cli.quiet);
        assert!(cli.no_color);
    }
}
