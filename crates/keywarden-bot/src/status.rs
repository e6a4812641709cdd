//! Periodic status report.
//!
//! At startup and once a day, render a health document (store counts,
//! backend reachability, uptime, memory) and push it to the configured
//! status channel. Without a channel configured the reporter is a
//! silent no-op.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use keywarden_core::{PanelConfig, Result};

use crate::frontend::codec::Outbound;
use crate::storage::Database;
use crate::view::{Document, Severity};

const REPORT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds and schedules the status report.
pub struct StatusReporter {
    db: Database,
    config: PanelConfig,
    client: reqwest::Client,
    started_at: Instant,
    interactions: Arc<AtomicU64>,
}

impl StatusReporter {
    pub fn new(db: Database, config: PanelConfig, interactions: Arc<AtomicU64>) -> Self {
        Self {
            db,
            config,
            client: reqwest::Client::new(),
            started_at: Instant::now(),
            interactions,
        }
    }

    /// Report on startup, then daily. Returns when the outbound channel
    /// closes (shutdown).
    pub async fn run(self, tx: mpsc::Sender<Outbound>) {
        let Some(channel_id) = self.config.status_channel_id.clone() else {
            tracing::debug!("no status channel configured; reporter idle");
            return;
        };

        let mut timer = tokio::time::interval(REPORT_INTERVAL);
        loop {
            timer.tick().await;

            let document = match self.report().await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("status report failed: {e}");
                    continue;
                }
            };

            let message = Outbound::ChannelMessage {
                channel_id: channel_id.clone(),
                document,
            };
            if tx.send(message).await.is_err() {
                return;
            }
        }
    }

    /// Build one status document from live store counts and a backend probe.
    pub async fn report(&self) -> Result<Document> {
        let licenses = self.db.count_licenses().await?;
        let apps = self.db.count_apps().await?;
        let active_apps = self.db.count_active_apps().await?;
        let maintenance = apps - active_apps;

        let backend = self.probe_backend().await;
        let healthy = backend.starts_with("reachable") || backend == "not configured";

        let mut doc = Document::new(
            "System Status",
            if healthy { Severity::Success } else { Severity::Error },
        )
        .field("Licenses", licenses.to_string())
        .field("Apps", apps.to_string())
        .field("Active Apps", active_apps.to_string())
        .field("In Maintenance", maintenance.to_string())
        .field("Backend", backend)
        .field("Uptime", format_uptime(self.started_at.elapsed().as_secs()))
        .field(
            "Interactions Served",
            self.interactions.load(Ordering::Relaxed).to_string(),
        );

        if let Some(rss) = rss_megabytes() {
            doc = doc.field("Memory (RSS)", format!("{rss} MB"));
        }

        Ok(doc)
    }

    async fn probe_backend(&self) -> String {
        let Some(endpoint) = &self.config.health_endpoint else {
            return "not configured".to_string();
        };

        let url = format!("{}/health", endpoint.trim_end_matches('/'));
        let start = Instant::now();
        let result = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                format!("reachable ({} ms)", start.elapsed().as_millis())
            }
            Ok(response) => format!("degraded (HTTP {})", response.status().as_u16()),
            Err(e) => {
                tracing::warn!("health probe failed: {e}");
                "unreachable".to_string()
            }
        }
    }
}

/// Seconds as "1d 2h 3m 4s", omitting leading zero units.
pub fn format_uptime(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 || !parts.is_empty() {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || !parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}s"));
    parts.join(" ")
}

/// Resident set size from procfs, when the platform exposes it.
fn rss_megabytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb / 1024)
}
