//! Configuration validation with actionable error messages
//!
//! Validates the configuration and provides exact commands to fix issues.

use super::schema::Config;
use console::style;

/// A configuration validation error with an actionable fix
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The config field that has an error
    pub field: String,
    /// Description of what's wrong
    pub message: String,
    /// Exact command or setting to fix the issue
    pub fix_command: String,
}

/// A configuration validation warning (non-fatal)
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The config field with a potential issue
    pub field: String,
    /// Description of the warning
    pub message: String,
    /// Suggested fix
    pub fix_command: String,
}

/// Validate configuration and return warnings or the first error
///
/// Returns Ok(warnings) if validation passes (possibly with non-fatal
/// warnings). Returns Err(error) on the first fatal validation error
/// encountered. Validation is performed in order, stopping at the first error.
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>, ValidationError> {
    let mut warnings = Vec::new();

    if config.github.token.is_empty() {
        return Err(ValidationError {
            field: "github.token".to_string(),
            message: "GitHub token is required for API calls and clones".to_string(),
            fix_command: "export GITHUB_TOKEN=<your-token>".to_string(),
        });
    }

    if config.claude.timeout_secs == 0 {
        return Err(ValidationError {
            field: "claude.timeout_secs".to_string(),
            message: "session timeout must be > 0".to_string(),
            fix_command: "set claude.timeout_secs to 3600 in config.json".to_string(),
        });
    }

    if config.claude.binary.trim().is_empty() {
        return Err(ValidationError {
            field: "claude.binary".to_string(),
            message: "claude binary name cannot be empty".to_string(),
            fix_command: "set claude.binary to \"claude-code\" in config.json".to_string(),
        });
    }

    if config.daemon.port < 1024 {
        return Err(ValidationError {
            field: "daemon.port".to_string(),
            message: "port must be >= 1024 (non-privileged)".to_string(),
            fix_command: "set daemon.port to 8080 in config.json".to_string(),
        });
    }
    // Note: no need to check > 65535 - u16 type enforces this limit

    let discord = &config.notifications.discord;
    if discord.enabled && discord.webhook_url.is_none() {
        return Err(ValidationError {
            field: "notifications.discord.webhook_url".to_string(),
            message: "Discord notifications are enabled but no webhook URL is set".to_string(),
            fix_command: "export DISCORD_WEBHOOK_URL=<url>".to_string(),
        });
    }

    let email = &config.notifications.email;
    if email.enabled && email.smtp_server.is_none() {
        return Err(ValidationError {
            field: "notifications.email.smtp_server".to_string(),
            message: "email notifications are enabled but no SMTP server is set".to_string(),
            fix_command: "export SMTP_SERVER=<host>".to_string(),
        });
    }

    // Warnings (non-fatal)

    if email.enabled && email.to_email.is_none() {
        warnings.push(ValidationWarning {
            field: "notifications.email.to_email".to_string(),
            message: "no recipient configured; email notifications will be skipped".to_string(),
            fix_command: "export EMAIL_TO=<address>".to_string(),
        });
    }

    if is_network_exposed(&config.daemon.bind) && config.daemon.webhook_secret.is_none() {
        warnings.push(ValidationWarning {
            field: "daemon.webhook_secret".to_string(),
            message: "daemon bound to a network address without a webhook secret".to_string(),
            fix_command: "export GITHUB_WEBHOOK_SECRET=<secret>".to_string(),
        });
    }

    Ok(warnings)
}

/// Whether a bind address exposes the daemon beyond loopback
pub fn is_network_exposed(bind: &str) -> bool {
    !matches!(bind, "127.0.0.1" | "localhost" | "::1")
}

/// Display a validation error with styled formatting
pub fn display_validation_error(error: &ValidationError) {
    eprintln!();
    eprintln!("{}", style("Error: Configuration error").red().bold());
    eprintln!();
    eprintln!("  {}  {}", style("Field:").dim(), error.field);
    eprintln!("  {}  {}", style("Problem:").dim(), error.message);
    eprintln!();
    eprintln!("{}:", style("To fix, run").dim());
    eprintln!("  {}", style(&error.fix_command).cyan());
    eprintln!();
}

/// Display a validation warning with styled formatting
pub fn display_validation_warning(warning: &ValidationWarning) {
    eprintln!();
    eprintln!(
        "{}",
        style("Warning: Configuration warning").yellow().bold()
    );
    eprintln!();
    eprintln!("  {}  {}", style("Field:").dim(), warning.field);
    eprintln!("  {}  {}", style("Issue:").dim(), warning.message);
    eprintln!();
    eprintln!("{}:", style("To address, run").dim());
    eprintln!("  {}", style(&warning.fix_command).cyan());
    eprintln!();
}
