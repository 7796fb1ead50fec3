//! Daemon command implementation
//!
//! Runs a webhook listener that turns GitHub `issues` events into
//! claudeforge sessions. Requests are authenticated with
//! `X-Hub-Signature-256` when a webhook secret is configured.

use anyhow::{Result, anyhow};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use clap::Args;
use claudeforge_core::config::is_network_exposed;
use claudeforge_core::orchestrator::{Orchestrator, SessionRequest};
use claudeforge_core::webhook::{self, IssuesEvent};
use claudeforge_core::{Config, get_version};
use console::style;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Arguments for the daemon command
#[derive(Args)]
pub struct DaemonArgs {
    /// Host for webhook server (overrides daemon.bind)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port for webhook server (overrides daemon.port)
    #[arg(short = 'p', long)]
    pub port: Option<u16>,
}

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Run claudeforge as a daemon with webhook support
pub async fn cmd_daemon(args: &DaemonArgs, config: Config, quiet: bool) -> Result<()> {
    let host = args.host.clone().unwrap_or_else(|| config.daemon.bind.clone());
    let port = args.port.unwrap_or(config.daemon.port);

    // A network-exposed listener without signature verification would accept
    // arbitrary session requests.
    if is_network_exposed(&host) && config.daemon.webhook_secret.is_none() {
        return Err(anyhow!(
            "Refusing to bind {host} without a webhook secret.\n  Set {} or bind to 127.0.0.1.",
            style("GITHUB_WEBHOOK_SECRET").cyan()
        ));
    }

    if !quiet {
        println!("{}", style("Starting claudeforge daemon").green());
        println!("Listening on {host}:{port}");
        if config.daemon.webhook_secret.is_none() {
            println!(
                "{} No webhook secret configured; signatures will not be verified.",
                style("Warning:").yellow().bold()
            );
        }
    }

    let state = AppState {
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/healthz", get(handle_health))
        .route("/webhook", post(handle_webhook))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|e| anyhow!("Failed to bind {host}:{port}: {e}"))?;

    info!("daemon listening on {host}:{port}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !quiet {
        println!("{}", style("Daemon stopped").dim());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install ctrl-c handler: {e}");
    }
}

async fn handle_health() -> String {
    format!("claudeforge {} ok", get_version())
}

async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let signature = headers
        .get("x-hub-signature-256")
        .and_then(|v| v.to_str().ok());

    if let Err(status) = authorize(
        state.config.daemon.webhook_secret.as_deref(),
        signature,
        &body,
    ) {
        return status;
    }

    let event_kind = headers
        .get("x-github-event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if event_kind != "issues" {
        return (StatusCode::OK, "ignored");
    }

    let event: IssuesEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("rejecting malformed issues payload: {e}");
            return (StatusCode::BAD_REQUEST, "malformed payload");
        }
    };

    if !webhook::should_trigger(&event, &state.config.daemon.trigger_label) {
        return (StatusCode::OK, "ignored");
    }

    info!(
        "webhook triggered session for issue #{} ({})",
        event.issue.number, event.action
    );
    spawn_session(state.config.clone(), event);

    (StatusCode::ACCEPTED, "session started")
}

/// Check the request signature against the configured secret
///
/// With no secret configured every request is accepted (loopback-only mode).
fn authorize(
    secret: Option<&str>,
    signature: Option<&str>,
    body: &[u8],
) -> Result<(), (StatusCode, &'static str)> {
    let Some(secret) = secret else {
        return Ok(());
    };

    let Some(signature) = signature else {
        return Err((StatusCode::UNAUTHORIZED, "missing signature"));
    };

    webhook::verify_signature(body, signature, secret)
        .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid signature"))
}

/// Run a session for a triggered event on a detached task
fn spawn_session(config: Arc<Config>, event: IssuesEvent) {
    tokio::spawn(async move {
        let request = SessionRequest {
            issue_url: event.issue.html_url.clone(),
            instruction: config.daemon.default_instruction.clone(),
            branch_name: None,
            create_pr: true,
            draft_pr: config.workspace.draft_pr,
        };

        let mut orchestrator = match Orchestrator::new((*config).clone()) {
            Ok(orchestrator) => orchestrator,
            Err(e) => {
                error!("failed to build orchestrator for webhook session: {e}");
                return;
            }
        };

        let result = orchestrator.run_session(request).await;
        orchestrator.cleanup().await;

        if result.success {
            info!(
                "webhook session for issue #{} finished (pr: {})",
                event.issue.number,
                result.pr_url.as_deref().unwrap_or("none")
            );
        } else {
            error!(
                "webhook session for issue #{} failed: {}",
                event.issue.number,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmac_sign::sign;

    // Local HMAC helper mirroring GitHub's signature scheme
    mod hmac_sign {
        pub fn sign(payload: &[u8], secret: &str) -> String {
            use hmac::{Hmac, Mac};
            use sha2::Sha256;
            let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
            mac.update(payload);
            let hex: String = mac
                .finalize()
                .into_bytes()
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect();
            format!("sha256={hex}")
        }
    }

    #[test]
    fn no_secret_accepts_unsigned_requests() {
        assert!(authorize(None, None, b"body").is_ok());
    }

    #[test]
    fn secret_requires_signature_header() {
        let err = authorize(Some("s"), None, b"body").unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn valid_signature_is_accepted() {
        let body = b"payload";
        let signature = sign(body, "s3cret");
        assert!(authorize(Some("s3cret"), Some(&signature), body).is_ok());
    }

    #[test]
    fn invalid_signature_is_rejected() {
        let body = b"payload";
        let signature = sign(body, "other");
        let err = authorize(Some("s3cret"), Some(&signature), body).unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }
}
