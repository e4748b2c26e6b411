//! sclog-core — Star Citizen log classification core.
//!
//! This crate holds the pure, I/O-free half of sclog: the shared event
//! types, the per-line classifier, and the in-memory event store.
//!
//! # Architecture
//!
//! ```text
//! TailReader ──► LineClassifier ──► EventStore ──► queries (filter/search/exclusion)
//!   (sclog-ingest)    (here)            (here)
//! ```
//!
//! The ingestion side (file tailing, polling, snapshot publication) lives in
//! `sclog-ingest`; everything here is callable synchronously and is safe to
//! exercise from unit tests without a runtime.

pub mod classify;
pub mod config;
pub mod store;
pub mod types;

pub use classify::{classify, Classified};
pub use store::{EventFilter, EventStore};
pub use types::{Event, EventKind};
