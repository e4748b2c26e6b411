//! Event store — the single in-memory timeline of classified events.
//!
//! The store is the sole owner of a session's events. It is a single-writer
//! structure: the ingestion controller appends and clears; readers get
//! cloned snapshots via [`EventStore::events`] or composed queries via
//! [`EventStore::query`]. Cross-thread publication happens one layer up, in
//! `sclog-ingest`, which swaps whole snapshots through a watch channel so a
//! reader can never observe a partially-appended batch.

use std::collections::HashSet;

use crate::classify::Classified;
use crate::types::{Event, EventKind};

/// Ordered collection of [`Event`]s with filter, search, and
/// actor-exclusion queries. Cleared whenever the underlying file identity
/// changes; `seq` restarts from the beginning on clear.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
    next_seq: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a classified line, assigning the next sequence number.
    /// Never fails; identical raw lines are appended as distinct events.
    pub fn append(&mut self, classified: Classified) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.events.push(Event {
            seq,
            kind: classified.kind,
            ts: classified.ts,
            summary: classified.summary,
            details: classified.details,
            actors: classified.actors,
            raw: classified.raw,
        });
        seq
    }

    /// Empty the collection and reset the sequence counter. Used when the
    /// file is truncated, rotated, or replaced.
    pub fn clear(&mut self) {
        self.events.clear();
        self.next_seq = 0;
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Snapshot of all events, newest first.
    pub fn events(&self) -> Vec<Event> {
        self.events.iter().rev().cloned().collect()
    }

    /// Only events whose kind is in `enabled`, newest first. An empty set
    /// yields an empty result.
    pub fn filter(&self, enabled: &HashSet<EventKind>) -> Vec<Event> {
        self.events
            .iter()
            .rev()
            .filter(|event| enabled.contains(&event.kind))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over summary, details, and raw
    /// line, newest first. An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<Event> {
        let needle = query.trim().to_lowercase();
        self.events
            .iter()
            .rev()
            .filter(|event| event.matches_search(&needle))
            .cloned()
            .collect()
    }

    /// Hide routine events where `handle` is the sole actor. Events where
    /// the handle appears alongside another actor are retained — the ignored
    /// player being killed by someone else is still other-actor-relevant.
    pub fn excluding_actor(&self, handle: Option<&str>) -> Vec<Event> {
        let handle = handle.map(str::trim).filter(|h| !h.is_empty());
        self.events
            .iter()
            .rev()
            .filter(|event| match handle {
                Some(h) => !event.is_sole_actor(h),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Composed query: category filter, then actor exclusion, then text
    /// search. Newest first.
    pub fn query(&self, filter: &EventFilter) -> Vec<Event> {
        query_events(self.events.iter().rev(), filter)
    }
}

/// A composed view over the timeline. The three stages are applied in a
/// fixed order: category filter, actor exclusion, text search — search
/// narrows the category-filtered set, never widens it.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Kinds to show. Empty means show nothing.
    pub kinds: HashSet<EventKind>,
    /// Player handle whose sole-actor events are hidden.
    pub ignored_actor: Option<String>,
    /// Case-insensitive substring; empty means no text filtering.
    pub search: String,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            kinds: EventKind::ALL.into_iter().collect(),
            ignored_actor: None,
            search: String::new(),
        }
    }
}

impl EventFilter {
    fn matches(&self, event: &Event, needle: &str) -> bool {
        if !self.kinds.contains(&event.kind) {
            return false;
        }
        if let Some(ignored) = self.ignored_actor.as_deref().map(str::trim) {
            if !ignored.is_empty() && event.is_sole_actor(ignored) {
                return false;
            }
        }
        event.matches_search(needle)
    }
}

/// Apply `filter` over an already newest-first event sequence.
pub fn query_events<'a>(
    newest_first: impl Iterator<Item = &'a Event>,
    filter: &EventFilter,
) -> Vec<Event> {
    let needle = filter.search.trim().to_lowercase();
    newest_first
        .filter(|event| filter.matches(event, &needle))
        .cloned()
        .collect()
}
