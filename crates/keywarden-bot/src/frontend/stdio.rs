//! Stdio event loop.
//!
//! Reads inbound NDJSON interaction lines from stdin, dispatches each on
//! its own task, and serializes all outbound writes through one channel
//! so response lines never interleave. EOF on stdin ends the loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use keywarden_core::PanelConfig;

use crate::audit::AuditSink;
use crate::dispatch::Dispatcher;
use crate::status::StatusReporter;
use crate::storage::Database;

use super::codec::{Outbound, parse_line};

const OUTBOUND_BUFFER: usize = 64;

/// Run the panel until stdin closes.
pub async fn run(db: Database, config: PanelConfig) -> anyhow::Result<()> {
    run_with_input(db, config, tokio::io::stdin()).await
}

async fn run_with_input<R>(db: Database, config: PanelConfig, input: R) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    let audit = AuditSink::new(&config);
    audit
        .record(
            crate::view::Severity::Success,
            "Panel online",
            "Keywarden started and is accepting interactions.",
            "system",
        )
        .await;

    let dispatcher = Dispatcher::new(db.clone(), config.clone(), audit);
    let interactions = Arc::new(AtomicU64::new(0));

    let (tx, rx) = mpsc::channel::<Outbound>(OUTBOUND_BUFFER);

    let writer = tokio::spawn(write_outbound(rx));
    let reporter = StatusReporter::new(db, config, Arc::clone(&interactions));
    // held so the reporter's sender clone can be torn down on shutdown;
    // otherwise the writer never sees the channel close
    let reporter_handle = tokio::spawn(reporter.run(tx.clone()));

    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(envelope) = parse_line(&line) else {
            continue;
        };

        interactions.fetch_add(1, Ordering::Relaxed);

        // one task per interaction; the store serializes concurrent writes
        let dispatcher = dispatcher.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            tracing::debug!(
                interaction_id = %envelope.interaction_id,
                kind = envelope.interaction.kind(),
                "dispatching"
            );
            let effects = dispatcher.dispatch(&envelope.interaction).await;
            let response = Outbound::Response {
                interaction_id: envelope.interaction_id,
                effects,
            };
            if tx.send(response).await.is_err() {
                tracing::warn!("outbound channel closed; dropping response");
            }
        });
    }

    tracing::info!("stdin closed; shutting down");
    reporter_handle.abort();
    drop(tx);
    writer.await?;
    Ok(())
}

async fn write_outbound(mut rx: mpsc::Receiver<Outbound>) {
    let mut stdout = tokio::io::stdout();
    while let Some(outbound) = rx.recv().await {
        let mut line = match serde_json::to_string(&outbound) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("unserializable outbound message: {e}");
                continue;
            }
        };
        line.push('\n');

        if let Err(e) = stdout.write_all(line.as_bytes()).await {
            tracing::error!("stdout write failed: {e}");
            return;
        }
        if let Err(e) = stdout.flush().await {
            tracing::error!("stdout flush failed: {e}");
            return;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn eof_shuts_down_even_with_a_status_reporter() {
        let db = Database::open_in_memory().await.unwrap();
        // a configured channel keeps the reporter (and its sender) alive
        let config = PanelConfig {
            status_channel_id: Some("status-channel".to_string()),
            ..PanelConfig::default()
        };

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            run_with_input(db, config, tokio::io::empty()),
        )
        .await;

        assert!(result.is_ok(), "loop must return after EOF, not hang");
        result.unwrap().unwrap();
    }

    #[tokio::test]
    async fn eof_shuts_down_without_a_status_channel() {
        let db = Database::open_in_memory().await.unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            run_with_input(db, PanelConfig::default(), tokio::io::empty()),
        )
        .await;

        assert!(result.is_ok(), "loop must return after EOF, not hang");
        result.unwrap().unwrap();
    }
}
