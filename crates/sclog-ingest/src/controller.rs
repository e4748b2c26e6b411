//! Ingestion controller — drives the poll → classify → store cycle.
//!
//! One controller owns one [`TailReader`] and one [`EventStore`]; all
//! mutation happens on a single sequential path, either a periodic tick or
//! an explicit reload. Readers never touch the store directly: after each
//! cycle that appended events or performed a reset, the controller swaps a
//! whole [`StoreSnapshot`] into a watch channel. Snapshot swap-in is atomic,
//! so a presentation layer can never observe a partially-appended batch,
//! and the channel's change signal is the batched "store changed"
//! notification (one per cycle, not one per line).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};

use sclog_core::store::query_events;
use sclog_core::{classify, Event, EventFilter, EventStore};

use crate::tail::{ReadResult, TailReader};

/// Immutable view of the store published after each productive cycle.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    /// All events, newest first.
    pub events: Arc<Vec<Event>>,
    /// Suggested "ignore me" handle; see [`IngestionController::primary_nickname`].
    pub primary_nickname: Option<String>,
    /// Bumped on every file-identity reset, so consumers can tell a rebuilt
    /// timeline from an appended-to one.
    pub generation: u64,
}

impl StoreSnapshot {
    /// Composed query over the snapshot: category filter, actor exclusion,
    /// text search. Newest first.
    pub fn query(&self, filter: &EventFilter) -> Vec<Event> {
        query_events(self.events.iter(), filter)
    }
}

/// What one ingestion cycle did. Mostly interesting to tests and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Unchanged,
    Missing,
    Appended { events: usize },
    Reset { events: usize },
}

#[derive(Debug)]
struct ActorTally {
    display: String,
    count: u64,
    first_seen: u64,
}

/// Orchestrates TailReader → LineClassifier → EventStore.
pub struct IngestionController {
    tail: TailReader,
    store: EventStore,
    snapshot_tx: watch::Sender<StoreSnapshot>,
    actors: HashMap<String, ActorTally>,
    login_nickname: Option<String>,
    last_actor: Option<String>,
    generation: u64,
}

impl IngestionController {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (snapshot_tx, _) = watch::channel(StoreSnapshot::default());
        Self {
            tail: TailReader::new(path),
            store: EventStore::new(),
            snapshot_tx,
            actors: HashMap::new(),
            login_nickname: None,
            last_actor: None,
            generation: 0,
        }
    }

    /// New receiver for store snapshots. The value it starts on counts as
    /// seen; `changed()` resolves only after the next productive cycle.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Run one ingestion cycle. `Unchanged` and `Missing` mutate nothing
    /// and publish nothing.
    pub fn tick(&mut self) -> CycleOutcome {
        match self.tail.poll() {
            ReadResult::Unchanged => CycleOutcome::Unchanged,
            ReadResult::Missing => CycleOutcome::Missing,
            ReadResult::Appended(bytes) => {
                let events = self.ingest(&bytes);
                if events > 0 {
                    self.publish();
                }
                CycleOutcome::Appended { events }
            }
            ReadResult::Reset(bytes) => {
                tracing::debug!(path = %self.tail.path().display(), "file identity changed, rebuilding timeline");
                self.start_over();
                let events = self.ingest(&bytes);
                self.publish();
                CycleOutcome::Reset { events }
            }
        }
    }

    /// Immediate full re-read, regardless of detected change.
    pub fn reload(&mut self) -> CycleOutcome {
        self.tail.rewind();
        self.tick()
    }

    /// Switch to a different log file. Equivalent to a reset: the old
    /// timeline is discarded and the new file is read from the start.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> CycleOutcome {
        self.tail = TailReader::new(path);
        self.start_over();
        self.tick()
    }

    /// The default "ignore me" suggestion: the handle from the session's
    /// `nickname="…"` login line when one was seen, otherwise the most
    /// frequent actor since the last file-identity change (ties broken by
    /// earliest first appearance). This core never persists it; that is the
    /// settings collaborator's concern.
    pub fn primary_nickname(&self) -> Option<String> {
        if let Some(nickname) = &self.login_nickname {
            return Some(nickname.clone());
        }
        self.actors
            .values()
            .max_by(|a, b| {
                a.count
                    .cmp(&b.count)
                    .then_with(|| b.first_seen.cmp(&a.first_seen))
            })
            .map(|tally| tally.display.clone())
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Periodic driver: a recurring tick plus a coalescing manual-reload
    /// trigger. Both arms run on this single task, so a reload can never
    /// overlap an in-flight poll — requests are coalesced, not aborted.
    pub async fn run(mut self, poll_interval: Duration, reload: Arc<Notify>) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = reload.notified() => {
                    tracing::debug!("manual reload requested");
                    self.reload();
                }
            }
        }
    }

    fn start_over(&mut self) {
        self.store.clear();
        self.actors.clear();
        self.login_nickname = None;
        self.last_actor = None;
        self.generation += 1;
    }

    fn ingest(&mut self, bytes: &[u8]) -> usize {
        let text = String::from_utf8_lossy(bytes);
        if matches!(text, std::borrow::Cow::Owned(_)) {
            tracing::warn!(
                path = %self.tail.path().display(),
                "log bytes were not valid UTF-8, replaced offending sequences"
            );
        }
        let mut appended = 0;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if self.login_nickname.is_none() {
                if let Some(name) = extract_login_nickname(line) {
                    self.login_nickname = Some(name);
                }
            }
            let Some(classified) = classify(line, self.last_actor.as_deref()) else {
                continue;
            };
            self.last_actor = classified.actors.first().cloned();
            self.tally_actors(&classified.actors);
            self.store.append(classified);
            appended += 1;
        }
        appended
    }

    fn tally_actors(&mut self, actors: &[String]) {
        for actor in actors {
            let key = actor.to_ascii_lowercase();
            let next_index = self.actors.len() as u64;
            self.actors
                .entry(key)
                .or_insert_with(|| ActorTally {
                    display: actor.clone(),
                    count: 0,
                    first_seen: next_index,
                })
                .count += 1;
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(StoreSnapshot {
            events: Arc::new(self.store.events()),
            primary_nickname: self.primary_nickname(),
            generation: self.generation,
        });
    }
}

/// The session login line carries `nickname="…"`; the first one seen names
/// the local player.
fn extract_login_nickname(line: &str) -> Option<String> {
    let marker = "nickname=\"";
    let start = line.find(marker)? + marker.len();
    let rest = &line[start..];
    let end = rest.find('"')?;
    let name = rest[..end].trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_nickname_extraction() {
        let line = r#"<2024-04-02T20:58:01.000Z> [Notice] <AccountLoginCharacterStatus_Character> ... name RedlineMara - state STATE_CURRENT - nickname="RedlineMara""#;
        assert_eq!(
            extract_login_nickname(line),
            Some("RedlineMara".to_string())
        );
        assert_eq!(extract_login_nickname("no marker here"), None);
        assert_eq!(extract_login_nickname(r#"nickname="""#), None);
    }
}
