//! Config subcommand implementations
//!
//! Provides `claudeforge config` subcommands for viewing and checking
//! configuration.

mod check;
mod show;

use anyhow::Result;
use clap::{Args, Subcommand};
use claudeforge_core::Config;

pub use check::cmd_config_check;
pub use show::cmd_config_show;

/// Configuration command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

/// Configuration management subcommands
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show current configuration
    Show {
        /// Output as JSON instead of table format
        #[arg(long)]
        json: bool,
    },
    /// Check that the configuration is ready for sessions
    Check,
}

/// Handle config command
///
/// Routes to the appropriate handler based on the subcommand.
/// If no subcommand is given, defaults to Show.
pub fn cmd_config(args: &ConfigArgs, config: &Config, quiet: bool) -> Result<()> {
    match &args.command {
        Some(ConfigSubcommands::Show { json }) => cmd_config_show(config, *json, quiet),
        Some(ConfigSubcommands::Check) => cmd_config_check(config, quiet),
        None => cmd_config_show(config, args.json, quiet),
    }
}
