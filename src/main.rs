use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use sclog_core::config::Config;
use sclog_core::{Event, EventFilter, EventKind};
use sclog_ingest::IngestionController;

mod paths;

#[derive(Parser)]
#[command(name = "sclog", about = "Star Citizen Game.log tail — classified kill feed")]
struct Cli {
    /// Path to Game.log (falls back to ingest.log_path in config).
    path: Option<String>,

    /// Poll interval in seconds (overrides config).
    #[arg(long)]
    interval: Option<u64>,

    /// Show only these kinds, repeatable: kill, spawn, corpse, zone,
    /// status, hit, vehicle.
    #[arg(long = "kind")]
    kinds: Vec<EventKind>,

    /// Hide routine events where this player is the only actor involved.
    #[arg(long)]
    ignore_player: Option<String>,

    /// Case-insensitive substring filter over summary, details, and raw line.
    #[arg(long)]
    search: Option<String>,

    /// Emit events as JSON lines instead of formatted text.
    #[arg(long)]
    json: bool,

    /// Write debug logs to stderr (RUST_LOG controls the filter).
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    let config = Config::load().unwrap_or_else(|_| Config::defaults());

    let raw_path = cli
        .path
        .or_else(|| config.ingest.log_path.clone())
        .context("no log file given — pass a path or set ingest.log_path in config")?;
    let path = paths::resolve_input_path(&raw_path);
    anyhow::ensure!(!path.as_os_str().is_empty(), "log file path is empty");

    let interval = Duration::from_secs(
        cli.interval
            .unwrap_or(config.ingest.poll_interval_secs)
            .max(1),
    );

    let filter = EventFilter {
        kinds: if cli.kinds.is_empty() {
            EventKind::ALL.into_iter().collect()
        } else {
            cli.kinds.iter().copied().collect()
        },
        ignored_actor: cli.ignore_player.or(config.view.ignored_player),
        search: cli.search.unwrap_or_default(),
    };

    let controller = IngestionController::new(&path);
    let mut snapshots = controller.subscribe();
    let reload = Arc::new(tokio::sync::Notify::new());
    tokio::spawn(controller.run(interval, Arc::clone(&reload)));

    // SIGHUP forces a full re-read without waiting for the next poll.
    #[cfg(unix)]
    if let Ok(mut hangup) =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
    {
        tokio::spawn(async move {
            while hangup.recv().await.is_some() {
                reload.notify_one();
            }
        });
    }

    tracing::info!(path = %path.display(), "tailing");

    let mut last_generation = 0u64;
    let mut last_seq = 0u64;
    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.generation != last_generation {
            last_generation = snapshot.generation;
            last_seq = 0;
        }

        // Snapshot is newest-first; print the fresh tail oldest-first.
        let fresh: Vec<Event> = snapshot
            .query(&filter)
            .into_iter()
            .filter(|event| event.seq > last_seq)
            .collect();
        if let Some(newest) = snapshot.events.first() {
            last_seq = newest.seq;
        }
        for event in fresh.into_iter().rev() {
            if cli.json {
                println!("{}", serde_json::to_string(&event)?);
            } else {
                println!("{}", render_line(&event));
            }
        }
    }

    Ok(())
}

fn render_line(event: &Event) -> String {
    let ts = event
        .ts
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    format!("{ts} | {:<7} | {}", event.kind.label(), event.summary)
}
