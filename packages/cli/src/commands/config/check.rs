//! Config check subcommand
//!
//! Verifies that the configuration is ready for running sessions: token
//! present, tool binary resolvable, and notification channels consistent.

use anyhow::{Result, anyhow};
use claudeforge_core::Config;
use claudeforge_core::config::{
    display_validation_error, display_validation_warning, validate_config,
};
use console::style;
use std::path::{Path, PathBuf};

/// Check configuration readiness
///
/// Prints a pass/fail line per check, then any validation errors and
/// warnings. Returns an error when a fatal problem is found so the process
/// exits non-zero.
pub fn cmd_config_check(config: &Config, quiet: bool) -> Result<()> {
    if !quiet {
        println!("{}", style("Checking claudeforge configuration").bold());
        println!();
    }

    let mut ok = true;

    ok &= report(
        !config.github.token.is_empty(),
        "GitHub token configured",
        "GitHub token missing (set GITHUB_TOKEN)",
        quiet,
    );

    let binary_path = find_in_path(&config.claude.binary, std::env::var_os("PATH"));
    ok &= report(
        binary_path.is_some(),
        &format!("Claude Code binary found ({})", config.claude.binary),
        &format!("Claude Code binary not found on PATH ({})", config.claude.binary),
        quiet,
    );

    let clone_dir = Path::new(&config.workspace.clone_dir);
    report(
        clone_dir.exists(),
        &format!("Clone directory exists ({})", config.workspace.clone_dir),
        &format!(
            "Clone directory does not exist yet ({}); it will be created on first run",
            config.workspace.clone_dir
        ),
        quiet,
    );

    if !quiet {
        let discord = if config.notifications.discord.enabled {
            "enabled"
        } else {
            "disabled"
        };
        let email = if config.notifications.email.enabled {
            "enabled"
        } else {
            "disabled"
        };
        println!("  Discord notifications: {discord}");
        println!("  Email notifications: {email}");
        println!();
    }

    match validate_config(config) {
        Ok(warnings) => {
            if !quiet {
                for warning in &warnings {
                    display_validation_warning(warning);
                }
            }
        }
        Err(error) => {
            display_validation_error(&error);
            ok = false;
        }
    }

    if ok {
        if !quiet {
            println!("{}", style("Configuration looks good").green());
        }
        Ok(())
    } else {
        Err(anyhow!("configuration check failed"))
    }
}

fn report(passed: bool, pass_msg: &str, fail_msg: &str, quiet: bool) -> bool {
    if !quiet {
        if passed {
            println!("  {} {pass_msg}", style("✓").green());
        } else {
            println!("  {} {fail_msg}", style("✗").red());
        }
    }
    passed
}

/// Resolve a binary name against a PATH value
///
/// Names containing a path separator are checked as-is.
fn find_in_path(binary: &str, path_var: Option<std::ffi::OsString>) -> Option<PathBuf> {
    if binary.contains('/') {
        let path = PathBuf::from(binary);
        return path.exists().then_some(path);
    }

    let path_var = path_var?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.exists())
}
