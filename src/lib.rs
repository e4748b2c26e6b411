//! sclog — Star Citizen Game.log tail.
//!
//! Classifies the lines an external game client appends to `Game.log` into
//! a closed set of event categories and keeps a live, filterable timeline.
//!
//! # Architecture
//!
//! ```text
//! TailReader ──► LineClassifier ──► EventStore ──► snapshot (watch channel)
//!      └────────── IngestionController ──────────────┘
//! ```
//!
//! The controller runs on one background task; the binary (or any other
//! presentation layer) subscribes to snapshots and queries them. This crate
//! re-exports the two member crates so integration tests can import
//! everything from one place.

pub use sclog_core::{classify, Classified, Event, EventFilter, EventKind, EventStore};
pub use sclog_ingest::{CycleOutcome, IngestionController, ReadResult, StoreSnapshot, TailReader};
