//! Test builders — ergonomic constructors for `Classified` store entries.
//!
//! These are for readability in assertions, not for production use; store
//! tests that don't care about real log syntax build entries directly
//! instead of round-tripping through the classifier.

use sclog::{Classified, EventKind};

/// Fluent builder for [`Classified`] test fixtures.
///
/// # Example
///
/// ```rust
/// let entry = ClassifiedBuilder::new(EventKind::Kill, "Bob killed Alice")
///     .actor("Bob")
///     .actor("Alice")
///     .build();
/// ```
pub struct ClassifiedBuilder {
    kind: EventKind,
    summary: String,
    details: Vec<String>,
    actors: Vec<String>,
    raw: String,
}

impl ClassifiedBuilder {
    pub fn new(kind: EventKind, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        Self {
            kind,
            raw: summary.clone(),
            summary,
            details: Vec::new(),
            actors: Vec::new(),
        }
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actors.push(actor.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    pub fn build(self) -> Classified {
        Classified {
            kind: self.kind,
            ts: None,
            summary: self.summary,
            details: self.details,
            actors: self.actors,
            raw: self.raw,
        }
    }
}

/// A kill with two distinct actors.
pub fn kill_between(killer: &str, victim: &str) -> Classified {
    ClassifiedBuilder::new(EventKind::Kill, format!("{killer} killed {victim}"))
        .actor(killer)
        .actor(victim)
        .build()
}

/// A routine event where `handle` is the only actor.
pub fn solo_event(kind: EventKind, handle: &str) -> Classified {
    ClassifiedBuilder::new(kind, format!("{handle} did something routine"))
        .actor(handle)
        .build()
}
