//! Discord webhook notifications
//!
//! Posts session status messages with an embed to a Discord webhook URL.

use super::{NotifyError, SessionReport, SessionStatus};
use serde_json::{Value, json};
use tracing::debug;

/// Discord notification handler
pub struct DiscordNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl DiscordNotifier {
    pub fn new(webhook_url: &str) -> Self {
        Self {
            webhook_url: webhook_url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Post a status message with embed to the webhook
    pub async fn send_session_status(
        &self,
        status: SessionStatus,
        issue_url: &str,
        report: &SessionReport,
    ) -> Result<(), NotifyError> {
        let message = format!("ClaudeForge session {status} for {issue_url}");
        let embed = build_session_embed(status, issue_url, report);
        let payload = json!({
            "content": message,
            "embeds": [embed],
        });

        self.client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        debug!("Discord webhook message sent");
        Ok(())
    }
}

fn status_color(status: SessionStatus) -> u32 {
    match status {
        SessionStatus::Success => 0x00ff00,
        SessionStatus::Error => 0xff0000,
        _ => 0xffaa00,
    }
}

/// Build the Discord embed for a session status report
pub fn build_session_embed(status: SessionStatus, issue_url: &str, report: &SessionReport) -> Value {
    let mut fields = vec![
        json!({"name": "Issue URL", "value": issue_url, "inline": false}),
        json!({"name": "Status", "value": status.as_str(), "inline": true}),
    ];

    if !report.changes.is_empty() {
        // Embed field values are size-limited; show at most five changes.
        let changes_text = report
            .changes
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        fields.push(json!({"name": "Changes Made", "value": changes_text, "inline": false}));
    }

    if let Some(pr_url) = &report.pr_url {
        fields.push(json!({"name": "Pull Request", "value": pr_url, "inline": false}));
    }

    let mut embed = json!({
        "title": format!("ClaudeForge Session {}", status.title()),
        "color": status_color(status),
        "fields": fields,
        "timestamp": report.timestamp,
    });

    if let Some(summary) = &report.summary {
        embed["description"] = json!(summary);
    }

    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SessionReport {
        SessionReport {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            summary: Some("All done".to_string()),
            pr_url: Some("https://github.com/a/b/pull/5".to_string()),
            branch: Some("claudeforge-issue-1-1".to_string()),
            changes: (1..=7).map(|i| format!("change {i}")).collect(),
            errors: vec![],
        }
    }

    #[test]
    fn embed_title_and_color_follow_status() {
        let embed = build_session_embed(SessionStatus::Success, "url", &report());
        assert_eq!(embed["title"], "ClaudeForge Session Success");
        assert_eq!(embed["color"], 0x00ff00);

        let embed = build_session_embed(SessionStatus::Error, "url", &report());
        assert_eq!(embed["color"], 0xff0000);

        let embed = build_session_embed(SessionStatus::Started, "url", &report());
        assert_eq!(embed["color"], 0xffaa00);
    }

    #[test]
    fn embed_limits_changes_to_five() {
        let embed = build_session_embed(SessionStatus::Success, "url", &report());
        let changes_field = embed["fields"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["name"] == "Changes Made")
            .unwrap();
        let lines: Vec<&str> = changes_field["value"].as_str().unwrap().lines().collect();
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn embed_includes_pr_field_and_description() {
        let embed = build_session_embed(SessionStatus::Success, "url", &report());
        assert_eq!(embed["description"], "All done");
        assert!(
            embed["fields"]
                .as_array()
                .unwrap()
                .iter()
                .any(|f| f["name"] == "Pull Request")
        );
    }

    #[test]
    fn embed_omits_optional_fields_when_absent() {
        let embed = build_session_embed(SessionStatus::Started, "url", &SessionReport::default());
        assert!(embed.get("description").is_none());
        let fields = embed["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
    }
}
