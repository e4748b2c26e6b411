//! sclog-ingest — file tailing and the ingestion cycle for sclog.
//!
//! [`TailReader`] turns "a file an external process appends to" into a
//! stream of byte batches with truncation/rotation detection.
//! [`IngestionController`] drives poll → classify → store on a periodic
//! cycle and publishes whole-store snapshots through a `tokio::sync::watch`
//! channel, which doubles as the "store changed" notification.

pub mod controller;
pub mod tail;

pub use controller::{CycleOutcome, IngestionController, StoreSnapshot};
pub use tail::{ReadResult, TailReader};
