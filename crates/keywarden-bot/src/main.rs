//! Keywarden Bot
//!
//! Chat-operated admin panel for a software-licensing backend. Inbound
//! interaction events arrive as NDJSON on stdin; render effects leave as
//! NDJSON on stdout. A thin platform shim owns the gateway connection.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use keywarden_bot::frontend;
use keywarden_bot::storage::Database;
use keywarden_core::PanelConfig;

#[derive(Parser, Debug)]
#[command(name = "keywarden-bot")]
#[command(version, about = "Keywarden - licensing admin panel")]
struct Args {
    /// Database file path
    #[arg(long, env = "KEYWARDEN_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Comma-separated role ids allowed to operate the panel
    #[arg(long, env = "KEYWARDEN_ROLE_IDS")]
    role_ids: Option<String>,

    /// Webhook URL for the audit sink
    #[arg(long, env = "KEYWARDEN_AUDIT_WEBHOOK")]
    audit_webhook: Option<String>,

    /// Channel id receiving the periodic status report
    #[arg(long, env = "KEYWARDEN_STATUS_CHANNEL")]
    status_channel: Option<String>,

    /// Licensing backend base URL, probed at `<url>/health`
    #[arg(long, env = "KEYWARDEN_HEALTH_ENDPOINT")]
    health_endpoint: Option<String>,

    /// Log level filter (e.g. "info", "debug", "warn").
    #[arg(long, default_value = "info", env = "KEYWARDEN_LOG_LEVEL")]
    log_level: String,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, env = "KEYWARDEN_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_filter = format!("keywarden_bot={0},keywarden_core={0}", args.log_level);
    keywarden_core::tracing_init::init_tracing(&log_filter, args.log_json);

    let config = PanelConfig {
        allowed_role_ids: args
            .role_ids
            .as_deref()
            .map(PanelConfig::parse_role_ids)
            .unwrap_or_default(),
        audit_webhook_url: args.audit_webhook,
        status_channel_id: args.status_channel,
        health_endpoint: args.health_endpoint,
    };

    if config.allowed_role_ids.is_empty() {
        tracing::warn!("no allowed role ids configured; every command will be denied");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        roles = config.allowed_role_ids.len(),
        audit = config.audit_webhook_url.is_some(),
        "Starting keywarden-bot"
    );

    let db = if let Some(path) = &args.db_path {
        info!(path = %path.display(), "Opening database");
        Database::open(path).await?
    } else {
        let default_path = default_db_path()?;
        if let Some(parent) = default_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %default_path.display(), "Opening database (default path)");
        Database::open(&default_path).await?
    };

    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    // Notify systemd that the panel is ready (unix only).
    #[cfg(unix)]
    sd_notify::notify(true, &[sd_notify::NotifyState::Ready])?;

    #[cfg(unix)]
    let sigterm_future = sigterm.recv();
    #[cfg(not(unix))]
    let sigterm_future = std::future::pending::<Option<()>>();

    tokio::select! {
        result = frontend::run(db, config) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C shutdown signal");
        }
        _ = sigterm_future => {
            info!("Received SIGTERM shutdown signal");
        }
    }

    info!("Panel stopped");
    Ok(())
}

/// Default database path: ~/.keywarden/bot.db
fn default_db_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".keywarden").join("bot.db"))
}
