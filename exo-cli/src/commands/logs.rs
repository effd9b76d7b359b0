//! Log command handlers
//!
//! Tails process logs through a [`LogsStore`], the same state container a
//! graphical client would drive.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use exo_client::{LogsStore, RpcClient};
use exo_core::domain::log::LogEvent;
use tracing::{debug, warn};

use crate::config::Config;
use crate::workspace_resolver::resolve_workspace;

/// Print the events of `logs` (all logs when empty), optionally following
///
/// Transient failures while following are logged and retried on the next
/// tick; client errors (4xx) end the command.
pub async fn tail_logs(
    client: &RpcClient,
    config: &Config,
    logs: Vec<String>,
    follow: bool,
) -> Result<()> {
    let workspace = resolve_workspace(client, config).await?;
    let store = LogsStore::with_buffer_size(Arc::new(workspace), config.log_buffer_size);

    if logs.is_empty() {
        store
            .refresh_logs(true)
            .await
            .context("Failed to fetch log events")?;
    }
    for log in &logs {
        store
            .set_log_visibility(log, true)
            .await
            .with_context(|| format!("Failed to fetch events of log '{}'", log))?;
    }

    let mut last_printed = print_new_events(&store, None);

    while follow {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(config.poll_interval) => {}
        }

        match store.refresh_logs(false).await {
            Ok(()) => last_printed = print_new_events(&store, last_printed),
            Err(err) if err.is_client_error() => {
                return Err(err).context("Failed to fetch log events");
            }
            Err(err) => warn!(error = %err, "log fetch failed, retrying"),
        }
    }

    Ok(())
}

/// Print the buffered events that follow `last_printed`
///
/// Returns the id of the newest event printed so far. When `last_printed`
/// has been evicted from the buffer, the whole buffer is printed.
fn print_new_events(store: &LogsStore, last_printed: Option<String>) -> Option<String> {
    let snapshot = store.snapshot();
    let Some(events) = snapshot.events.data() else {
        return last_printed;
    };

    let fresh = unseen(events, last_printed.as_deref());
    debug!(count = fresh.len(), "printing log events");
    for event in fresh {
        print_event(event);
    }

    events.last().map(|e| e.id.clone()).or(last_printed)
}

fn unseen<'a>(events: &'a [LogEvent], last_printed: Option<&str>) -> &'a [LogEvent] {
    let start = last_printed
        .and_then(|id| events.iter().rposition(|e| e.id == id))
        .map_or(0, |pos| pos + 1);
    &events[start..]
}

fn print_event(event: &LogEvent) {
    println!(
        "{} {} {}",
        event.log.cyan(),
        event.timestamp.dimmed(),
        event.message
    );
}
