//! Core types for sclog.
//!
//! This module defines the data structures shared across all layers: the
//! classified [`Event`] and its closed [`EventKind`] category set.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One recognized occurrence derived from a single log line.
///
/// Events are immutable once appended to the store. `seq` is assigned by the
/// store at append time and is strictly increasing within a session; it is
/// the authoritative ordering key, since `ts` may be absent when the line
/// carried no parseable timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Ingestion-order index, strictly increasing, never reused.
    pub seq: u64,
    /// Category this event was classified into.
    pub kind: EventKind,
    /// Timestamp parsed from the line's bracketed prefix, if it was RFC 3339.
    pub ts: Option<DateTime<Utc>>,
    /// Short one-line description built from the extracted fields.
    pub summary: String,
    /// Remaining extracted fields as `Label: value` lines. May be empty.
    pub details: Vec<String>,
    /// Player handles implicated in the event. Deduplicated
    /// case-insensitively; `unknown` and empty handles are dropped.
    pub actors: Vec<String>,
    /// The original unmodified line, retained for search and audit.
    pub raw: String,
}

impl Event {
    /// Whether `handle` appears among this event's actors (case-insensitive).
    pub fn involves(&self, handle: &str) -> bool {
        self.actors
            .iter()
            .any(|actor| actor.eq_ignore_ascii_case(handle))
    }

    /// Whether `handle` is the *only* actor on this event. Routine self-only
    /// events from an ignored player are hidden on this basis; events where
    /// the handle appears alongside someone else are retained, since those
    /// carry other-actor-relevant information.
    pub fn is_sole_actor(&self, handle: &str) -> bool {
        self.actors.len() == 1 && self.actors[0].eq_ignore_ascii_case(handle)
    }

    /// Case-insensitive substring match against summary, details, and the
    /// raw line. `needle` must already be lowercased by the caller.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.summary.to_lowercase().contains(needle)
            || self
                .details
                .iter()
                .any(|line| line.to_lowercase().contains(needle))
            || self.raw.to_lowercase().contains(needle)
    }
}

/// Closed category set. Lines matching none of these produce no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Kill,
    SpawnLoss,
    CorpseState,
    ZoneMove,
    StatusEffect,
    Hit,
    VehicleDestruction,
}

impl EventKind {
    /// All seven categories, in classifier priority order.
    pub const ALL: [EventKind; 7] = [
        EventKind::Kill,
        EventKind::SpawnLoss,
        EventKind::CorpseState,
        EventKind::ZoneMove,
        EventKind::StatusEffect,
        EventKind::Hit,
        EventKind::VehicleDestruction,
    ];

    /// Column label used by the text renderer.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Kill => "Kill",
            EventKind::SpawnLoss => "Spawn",
            EventKind::CorpseState => "Corpse",
            EventKind::ZoneMove => "Zone",
            EventKind::StatusEffect => "Status",
            EventKind::Hit => "Hit",
            EventKind::VehicleDestruction => "Vehicle",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            EventKind::Kill => "kill",
            EventKind::SpawnLoss => "spawn",
            EventKind::CorpseState => "corpse",
            EventKind::ZoneMove => "zone",
            EventKind::StatusEffect => "status",
            EventKind::Hit => "hit",
            EventKind::VehicleDestruction => "vehicle",
        };
        write!(f, "{token}")
    }
}

/// Error returned when parsing an [`EventKind`] from an unknown token.
#[derive(Debug, thiserror::Error)]
#[error("unknown event kind {0:?} (expected one of: kill, spawn, corpse, zone, status, hit, vehicle)")]
pub struct UnknownKind(pub String);

impl std::str::FromStr for EventKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kill" | "kills" => Ok(EventKind::Kill),
            "spawn" | "spawn-loss" | "spawns" => Ok(EventKind::SpawnLoss),
            "corpse" | "corpse-state" => Ok(EventKind::CorpseState),
            "zone" | "zone-move" => Ok(EventKind::ZoneMove),
            "status" | "status-effect" => Ok(EventKind::StatusEffect),
            "hit" | "hits" => Ok(EventKind::Hit),
            "vehicle" | "vehicle-destruction" => Ok(EventKind::VehicleDestruction),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}
