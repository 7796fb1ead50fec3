//! Configuration management
//!
//! Loads the JSONC config file from the platform config directory, applies
//! environment variable overrides, and validates the result. Missing config
//! files fall back to defaults so that environment-only setups (e.g. inside a
//! container with just GITHUB_TOKEN set) work without a file on disk.

pub mod paths;
mod schema;
mod validation;

pub use schema::{
    ClaudeConfig, Config, DaemonConfig, DiscordConfig, EmailConfig, GithubConfig,
    NotificationsConfig, WorkspaceConfig,
};
pub use validation::{
    ValidationError, ValidationWarning, display_validation_error, display_validation_warning,
    is_network_exposed, validate_config,
};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config path; ensure XDG_CONFIG_HOME or HOME is set")]
    NoConfigPath,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load configuration from an explicit path
///
/// The file is parsed as JSONC (comments and trailing commas allowed).
/// Environment overrides are applied after parsing.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = parse_config(&text, path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Load configuration from the default platform location
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = paths::get_config_path().ok_or(ConfigError::NoConfigPath)?;
    load_config_from(&path)
}

/// Load configuration, falling back to defaults when no file exists
///
/// Environment overrides are applied either way, so `GITHUB_TOKEN` alone is
/// enough to produce a usable config.
pub fn load_config_or_default() -> Result<Config, ConfigError> {
    let path = paths::get_config_path().ok_or(ConfigError::NoConfigPath)?;
    if path.exists() {
        load_config_from(&path)
    } else {
        debug!("no config file at {}; using defaults", path.display());
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }
}

/// Save configuration to the default platform location
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let path = paths::get_config_path().ok_or(ConfigError::NoConfigPath)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        message: e.to_string(),
    })?;
    std::fs::write(&path, json).map_err(|source| ConfigError::Write { path, source })
}

fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let value = jsonc_parser::parse_to_serde_value(text, &Default::default()).map_err(|e| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let value = value.ok_or_else(|| ConfigError::Parse {
        path: path.to_path_buf(),
        message: "config file is empty".to_string(),
    })?;

    serde_json::from_value(value).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply environment variable overrides to a loaded config
///
/// The lookup function is injected so tests can supply a fixed environment.
/// Setting a channel's delivery target via the environment also enables that
/// channel, so environment-only setups need no config file.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(token) = lookup("GITHUB_TOKEN") {
        config.github.token = token;
    }

    if let Some(raw) = lookup("CLAUDE_TIMEOUT") {
        match raw.parse::<u64>() {
            Ok(secs) => config.claude.timeout_secs = secs,
            Err(_) => debug!("ignoring non-numeric CLAUDE_TIMEOUT value"),
        }
    }

    if let Some(url) = lookup("DISCORD_WEBHOOK_URL") {
        config.notifications.discord.webhook_url = Some(url);
        config.notifications.discord.enabled = true;
    }
    if let Some(token) = lookup("DISCORD_BOT_TOKEN") {
        config.notifications.discord.bot_token = Some(token);
    }

    if let Some(server) = lookup("SMTP_SERVER") {
        config.notifications.email.smtp_server = Some(server);
        config.notifications.email.enabled = true;
    }
    if let Some(username) = lookup("SMTP_USERNAME") {
        config.notifications.email.username = Some(username);
    }
    if let Some(password) = lookup("SMTP_PASSWORD") {
        config.notifications.email.password = Some(password);
    }
    if let Some(to) = lookup("EMAIL_TO") {
        config.notifications.email.to_email = Some(to);
    }

    if let Some(secret) = lookup("GITHUB_WEBHOOK_SECRET") {
        config.daemon.webhook_secret = Some(secret);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_set_token_and_timeout() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            env_from(&[("GITHUB_TOKEN", "ghp_test"), ("CLAUDE_TIMEOUT", "900")]),
        );
        assert_eq!(config.github.token, "ghp_test");
        assert_eq!(config.claude.timeout_secs, 900);
    }

    #[test]
    fn env_overrides_enable_channels_with_delivery_target() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            env_from(&[
                ("DISCORD_WEBHOOK_URL", "https://discord.test/hook"),
                ("SMTP_SERVER", "smtp.test"),
                ("SMTP_USERNAME", "bot@test"),
                ("EMAIL_TO", "dev@test"),
            ]),
        );
        assert!(config.notifications.discord.enabled);
        assert_eq!(
            config.notifications.discord.webhook_url.as_deref(),
            Some("https://discord.test/hook")
        );
        assert!(config.notifications.email.enabled);
        assert_eq!(
            config.notifications.email.smtp_server.as_deref(),
            Some("smtp.test")
        );
        assert_eq!(config.notifications.email.to_email.as_deref(), Some("dev@test"));
    }

    #[test]
    fn invalid_timeout_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, env_from(&[("CLAUDE_TIMEOUT", "soon")]));
        assert_eq!(config.claude.timeout_secs, 3600);
    }

    #[test]
    fn load_config_from_parses_jsonc_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
            // session budget
            "version": 1,
            "claude": { "timeout_secs": 60 },
        }"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.claude.timeout_secs, 60);
    }

    #[test]
    fn load_config_from_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"version": 1, "bogus": true}"#).unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_config_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
