//! Shared helpers for the integration harnesses.
//!
//! `builders` constructs store entries without going through the classifier;
//! `fixtures` holds real-shaped `Game.log` lines and tempfile helpers.

pub mod builders;
pub mod fixtures;

#[allow(unused_imports)]
pub use builders::*;
#[allow(unused_imports)]
pub use fixtures::*;
