//! Session notifications
//!
//! Fans out session status updates to the configured channels. Notification
//! failures are logged and never abort a session.

mod discord;
mod email;

pub use discord::DiscordNotifier;
pub use email::EmailNotifier;

use crate::config::NotificationsConfig;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from notification delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Discord webhook request failed: {0}")]
    Discord(#[from] reqwest::Error),

    #[error("email delivery failed: {0}")]
    Email(String),
}

/// The status of a session being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Started,
    Success,
    Completed,
    Failed,
    Error,
}

impl SessionStatus {
    /// Lowercase form used in message bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Started => "started",
            SessionStatus::Success => "success",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
            SessionStatus::Error => "error",
        }
    }

    /// Title-case form used in headings
    pub fn title(&self) -> &'static str {
        match self {
            SessionStatus::Started => "Started",
            SessionStatus::Success => "Success",
            SessionStatus::Completed => "Completed",
            SessionStatus::Failed => "Failed",
            SessionStatus::Error => "Error",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details attached to a status notification
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub timestamp: String,
    pub summary: Option<String>,
    pub pr_url: Option<String>,
    pub branch: Option<String>,
    pub changes: Vec<String>,
    pub errors: Vec<String>,
}

/// Manages all notification channels
pub struct NotificationManager {
    discord: Option<DiscordNotifier>,
    email: Option<EmailNotifier>,
}

impl NotificationManager {
    /// Build from config; disabled channels become no-ops
    pub fn new(config: &NotificationsConfig) -> Self {
        let discord = if config.discord.enabled {
            config
                .discord
                .webhook_url
                .as_deref()
                .map(DiscordNotifier::new)
        } else {
            None
        };

        let email = if config.email.enabled {
            EmailNotifier::from_config(&config.email)
        } else {
            None
        };

        Self { discord, email }
    }

    /// A manager with every channel disabled
    pub fn disabled() -> Self {
        Self {
            discord: None,
            email: None,
        }
    }

    /// Send a session status notification to all enabled channels
    ///
    /// Delivery failures are logged and swallowed; a notification must never
    /// fail the session it reports on.
    pub async fn notify_session_status(
        &self,
        status: SessionStatus,
        issue_url: &str,
        report: &SessionReport,
    ) {
        if self.discord.is_none() && self.email.is_none() {
            return;
        }

        info!("sending notifications for session {status}");

        if let Some(discord) = &self.discord
            && let Err(e) = discord.send_session_status(status, issue_url, report).await
        {
            warn!("failed to send Discord notification: {e}");
        }

        if let Some(email) = &self.email
            && let Err(e) = email.send_session_status(status, issue_url, report).await
        {
            warn!("failed to send email notification: {e}");
        }
    }
}
