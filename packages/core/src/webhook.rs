//! GitHub webhook verification and event filtering
//!
//! The daemon receives `issues` events from GitHub and decides which of them
//! should trigger a coding session. Request bodies are authenticated with the
//! `X-Hub-Signature-256` header (HMAC-SHA256 over the raw payload).

use crate::github::{Issue, Label, Repository};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

/// Errors from webhook verification
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook signature must use sha256=<hex> format")]
    MalformedSignature,

    #[error("webhook signature contains invalid hex")]
    InvalidHex,

    #[error("webhook signature verification failed")]
    VerificationFailed,
}

/// Payload of a GitHub `issues` event (the fields claudeforge consumes)
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: Issue,
    pub repository: Repository,
    #[serde(default)]
    pub label: Option<Label>,
}

/// Verify an `X-Hub-Signature-256` header against the raw request body
///
/// The comparison is constant-time via the HMAC verifier.
pub fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> Result<(), WebhookError> {
    let Some(digest_hex) = signature.strip_prefix("sha256=") else {
        return Err(WebhookError::MalformedSignature);
    };
    let signature_bytes = decode_hex(digest_hex)?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::VerificationFailed)?;
    mac.update(payload);
    mac.verify_slice(&signature_bytes)
        .map_err(|_| WebhookError::VerificationFailed)
}

/// Decide whether an `issues` event should trigger a session
///
/// Triggers on newly opened or reopened issues, and on `labeled` events when
/// the attached label matches the configured trigger label.
pub fn should_trigger(event: &IssuesEvent, trigger_label: &str) -> bool {
    match event.action.as_str() {
        "opened" | "reopened" => true,
        "labeled" => event
            .label
            .as_ref()
            .is_some_and(|label| label.name == trigger_label),
        _ => false,
    }
}

fn decode_hex(value: &str) -> Result<Vec<u8>, WebhookError> {
    let trimmed = value.trim();
    if trimmed.len() % 2 != 0 {
        return Err(WebhookError::InvalidHex);
    }
    trimmed
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            // Byte-wise iteration keeps multi-byte characters from slicing
            // mid-codepoint; they fail as invalid hex instead.
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or(WebhookError::InvalidHex)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::IssueState;

    fn sign(payload: &[u8], secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        let digest = mac.finalize().into_bytes();
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        format!("sha256={hex}")
    }

    fn event(action: &str, label: Option<&str>) -> IssuesEvent {
        IssuesEvent {
            action: action.to_string(),
            issue: Issue {
                number: 1,
                title: "t".to_string(),
                state: IssueState::Open,
                body: None,
                html_url: "https://github.com/a/b/issues/1".to_string(),
            },
            repository: Repository {
                full_name: "a/b".to_string(),
                description: None,
                language: None,
                default_branch: "main".to_string(),
                clone_url: "https://github.com/a/b.git".to_string(),
            },
            label: label.map(|name| Label {
                name: name.to_string(),
            }),
        }
    }

    #[test]
    fn correct_signature_verifies() {
        let payload = br#"{"action":"opened"}"#;
        let signature = sign(payload, "secret");
        assert!(verify_signature(payload, &signature, "secret").is_ok());
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let signature = sign(b"original", "secret");
        let err = verify_signature(b"tampered", &signature, "secret").unwrap_err();
        assert!(matches!(err, WebhookError::VerificationFailed));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let payload = b"body";
        let signature = sign(payload, "secret");
        assert!(verify_signature(payload, &signature, "other").is_err());
    }

    #[test]
    fn signature_without_prefix_is_malformed() {
        let err = verify_signature(b"body", "deadbeef", "secret").unwrap_err();
        assert!(matches!(err, WebhookError::MalformedSignature));
    }

    #[test]
    fn signature_with_bad_hex_is_rejected() {
        let err = verify_signature(b"body", "sha256=zzzz", "secret").unwrap_err();
        assert!(matches!(err, WebhookError::InvalidHex));
    }

    #[test]
    fn signature_with_multibyte_chars_is_rejected_not_panicking() {
        let err = verify_signature(b"body", "sha256=a\u{e9}a", "secret").unwrap_err();
        assert!(matches!(err, WebhookError::InvalidHex));

        let err = verify_signature(b"body", "sha256=\u{1f916}\u{1f916}", "secret").unwrap_err();
        assert!(matches!(err, WebhookError::InvalidHex));
    }

    #[test]
    fn opened_and_reopened_trigger() {
        assert!(should_trigger(&event("opened", None), "claudeforge"));
        assert!(should_trigger(&event("reopened", None), "claudeforge"));
    }

    #[test]
    fn labeled_triggers_only_on_matching_label() {
        assert!(should_trigger(
            &event("labeled", Some("claudeforge")),
            "claudeforge"
        ));
        assert!(!should_trigger(
            &event("labeled", Some("bug")),
            "claudeforge"
        ));
        assert!(!should_trigger(&event("labeled", None), "claudeforge"));
    }

    #[test]
    fn other_actions_are_ignored() {
        assert!(!should_trigger(&event("closed", None), "claudeforge"));
        assert!(!should_trigger(&event("edited", None), "claudeforge"));
    }

    #[test]
    fn issues_event_payload_parses() {
        let json = r#"{
            "action": "labeled",
            "issue": {
                "number": 7,
                "title": "Fix flaky test",
                "state": "open",
                "body": "details",
                "html_url": "https://github.com/a/b/issues/7"
            },
            "repository": {
                "full_name": "a/b",
                "description": null,
                "language": "Rust",
                "default_branch": "main",
                "clone_url": "https://github.com/a/b.git"
            },
            "label": {"name": "claudeforge"}
        }"#;
        let event: IssuesEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.action, "labeled");
        assert_eq!(event.issue.number, 7);
        assert_eq!(event.label.unwrap().name, "claudeforge");
    }
}
