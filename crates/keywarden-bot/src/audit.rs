//! Best-effort audit webhook sink.
//!
//! Delivery failures are logged and swallowed; the panel never blocks or
//! surfaces an operator-visible error because an audit POST failed.

use serde_json::json;

use keywarden_core::PanelConfig;
use keywarden_core::db::unix_timestamp;

use crate::view::Severity;

/// Webhook sink for security-relevant panel events.
#[derive(Clone)]
pub struct AuditSink {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl AuditSink {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: config.audit_webhook_url.clone(),
        }
    }

    /// Post one audit event. Without a configured webhook this degrades
    /// to a tracing record.
    pub async fn record(&self, severity: Severity, title: &str, description: &str, actor: &str) {
        tracing::info!(title, actor, "audit: {description}");

        let Some(url) = &self.webhook_url else {
            return;
        };

        let payload = json!({
            "severity": severity,
            "title": title,
            "description": description,
            "actor": actor,
            "timestamp": unix_timestamp(),
        });

        let result = self.client.post(url).json(&payload).send().await;
        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(status = %response.status(), "audit webhook rejected event");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("audit webhook unreachable: {e}"),
        }
    }
}
