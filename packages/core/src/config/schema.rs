//! Configuration schema for claudeforge
//!
//! Defines the structure and defaults for the config.json file.

use serde::{Deserialize, Serialize};

/// Main configuration structure for claudeforge
///
/// Serialized to/from `~/.config/claudeforge/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    pub version: u32,

    /// GitHub API access
    #[serde(default)]
    pub github: GithubConfig,

    /// Claude Code tool invocation
    #[serde(default)]
    pub claude: ClaudeConfig,

    /// Local repository workspace handling
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Optional notification channels
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Webhook daemon settings
    #[serde(default)]
    pub daemon: DaemonConfig,
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GithubConfig {
    /// Personal access token used for API calls and authenticated clones
    #[serde(default)]
    pub token: String,

    /// API base URL; override for GitHub Enterprise
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// Claude Code invocation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClaudeConfig {
    /// Executable to invoke for coding sessions (default: "claude-code")
    #[serde(default = "default_claude_binary")]
    pub binary: String,

    /// Maximum session duration in seconds (default: 3600)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Local workspace settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Directory where repositories are cloned (default: "/tmp/claudeforge-repos")
    #[serde(default = "default_clone_dir")]
    pub clone_dir: String,

    /// Open a pull request automatically after pushing changes (default: true)
    #[serde(default = "default_auto_create_pr")]
    pub auto_create_pr: bool,

    /// Open pull requests as drafts (default: false)
    #[serde(default)]
    pub draft_pr: bool,
}

/// Notification channel settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub email: EmailConfig,
}

/// Discord webhook notifications
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Webhook URL for posting session status messages
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Bot token (reserved for bot-based delivery)
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Channel ID (reserved for bot-based delivery)
    #[serde(default)]
    pub channel_id: Option<String>,
}

/// SMTP email notifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub smtp_server: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Recipient address for session status emails
    #[serde(default)]
    pub to_email: Option<String>,
}

/// Webhook daemon settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    /// Bind address (default: "127.0.0.1")
    /// Use "0.0.0.0" for network access (requires a webhook secret)
    #[serde(default = "default_daemon_bind")]
    pub bind: String,

    /// Port for the webhook listener (default: 8080)
    #[serde(default = "default_daemon_port")]
    pub port: u16,

    /// Shared secret for X-Hub-Signature-256 verification
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// Instruction used for sessions triggered by webhook events
    #[serde(default = "default_daemon_instruction")]
    pub default_instruction: String,

    /// Issue label that triggers a session on `labeled` events
    #[serde(default = "default_trigger_label")]
    pub trigger_label: String,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_claude_binary() -> String {
    "claude-code".to_string()
}

fn default_timeout_secs() -> u64 {
    3600
}

fn default_clone_dir() -> String {
    "/tmp/claudeforge-repos".to_string()
}

fn default_auto_create_pr() -> bool {
    true
}

fn default_smtp_port() -> u16 {
    587
}

fn default_daemon_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_daemon_port() -> u16 {
    8080
}

fn default_daemon_instruction() -> String {
    "Resolve this issue".to_string()
}

fn default_trigger_label() -> String {
    "claudeforge".to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
        }
    }
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            binary: default_claude_binary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            clone_dir: default_clone_dir(),
            auto_create_pr: default_auto_create_pr(),
            draft_pr: false,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: None,
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            to_email: None,
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_daemon_bind(),
            port: default_daemon_port(),
            webhook_secret: None,
            default_instruction: default_daemon_instruction(),
            trigger_label: default_trigger_label(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            github: GithubConfig::default(),
            claude: ClaudeConfig::default(),
            workspace: WorkspaceConfig::default(),
            notifications: NotificationsConfig::default(),
            daemon: DaemonConfig::default(),
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }
}
