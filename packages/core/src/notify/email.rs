//! Email notifications over SMTP
//!
//! Composes plain-text session status emails and sends them through an
//! SMTP relay with STARTTLS.

use super::{NotifyError, SessionReport, SessionStatus};
use crate::config::EmailConfig;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};

/// Email notification handler
pub struct EmailNotifier {
    smtp_server: String,
    smtp_port: u16,
    username: String,
    password: String,
    to_email: Option<String>,
}

impl EmailNotifier {
    /// Build from config; returns None when the SMTP server or credentials
    /// are missing
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        let smtp_server = config.smtp_server.clone()?;
        let username = config.username.clone()?;
        let password = config.password.clone()?;

        Some(Self {
            smtp_server,
            smtp_port: config.smtp_port,
            username,
            password,
            to_email: config.to_email.clone(),
        })
    }

    /// Compose and send a status email
    pub async fn send_session_status(
        &self,
        status: SessionStatus,
        issue_url: &str,
        report: &SessionReport,
    ) -> Result<(), NotifyError> {
        let Some(to_email) = &self.to_email else {
            warn!("email notifications enabled but no recipient configured; skipping");
            return Ok(());
        };

        let (subject, body) = compose_session_email(status, issue_url, report);

        let message = Message::builder()
            .from(
                self.username
                    .parse()
                    .map_err(|e| NotifyError::Email(format!("invalid sender address: {e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| NotifyError::Email(format!("invalid recipient address: {e}")))?)
            .subject(subject)
            .body(body)
            .map_err(|e| NotifyError::Email(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp_server)
            .map_err(|e| NotifyError::Email(e.to_string()))?
            .port(self.smtp_port)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Email(e.to_string()))?;

        debug!("email sent to {to_email}");
        Ok(())
    }
}

/// Compose the subject and plain-text body for a status email
pub fn compose_session_email(
    status: SessionStatus,
    issue_url: &str,
    report: &SessionReport,
) -> (String, String) {
    let subject = format!("ClaudeForge Session {} - {issue_url}", status.title());

    let mut lines = vec![
        format!(
            "ClaudeForge Session Status: {}",
            status.as_str().to_uppercase()
        ),
        String::new(),
        format!("Issue URL: {issue_url}"),
        String::new(),
    ];

    if let Some(summary) = &report.summary {
        lines.push("Summary:".to_string());
        lines.push(summary.clone());
        lines.push(String::new());
    }

    if !report.changes.is_empty() {
        lines.push("Changes Made:".to_string());
        for change in &report.changes {
            lines.push(format!("- {change}"));
        }
        lines.push(String::new());
    }

    if let Some(pr_url) = &report.pr_url {
        lines.push(format!("Pull Request: {pr_url}"));
        lines.push(String::new());
    }

    if !report.errors.is_empty() {
        lines.push("Errors:".to_string());
        for error in &report.errors {
            lines.push(format!("- {error}"));
        }
        lines.push(String::new());
    }

    lines.push("Generated by ClaudeForge".to_string());

    (subject, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_includes_status_and_issue() {
        let (subject, _) =
            compose_session_email(SessionStatus::Success, "https://x/1", &SessionReport::default());
        assert_eq!(subject, "ClaudeForge Session Success - https://x/1");
    }

    #[test]
    fn body_sections_render_when_present() {
        let report = SessionReport {
            timestamp: String::new(),
            summary: Some("Fixed it".to_string()),
            pr_url: Some("https://x/pull/2".to_string()),
            branch: None,
            changes: vec!["a.rs".to_string(), "b.rs".to_string()],
            errors: vec!["late warning".to_string()],
        };
        let (_, body) = compose_session_email(SessionStatus::Failed, "https://x/1", &report);
        assert!(body.starts_with("ClaudeForge Session Status: FAILED"));
        assert!(body.contains("Summary:\nFixed it"));
        assert!(body.contains("- a.rs"));
        assert!(body.contains("Pull Request: https://x/pull/2"));
        assert!(body.contains("Errors:\n- late warning"));
        assert!(body.ends_with("Generated by ClaudeForge"));
    }

    #[test]
    fn body_skips_empty_sections() {
        let (_, body) =
            compose_session_email(SessionStatus::Started, "https://x/1", &SessionReport::default());
        assert!(!body.contains("Summary:"));
        assert!(!body.contains("Changes Made:"));
        assert!(!body.contains("Errors:"));
    }

    #[test]
    fn notifier_requires_server_and_credentials() {
        let config = EmailConfig {
            enabled: true,
            smtp_server: Some("smtp.test".to_string()),
            smtp_port: 587,
            username: None,
            password: None,
            to_email: None,
        };
        assert!(EmailNotifier::from_config(&config).is_none());
    }
}
