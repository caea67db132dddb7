//! # LineKit History
//!
//! Generic, linear undo/redo history over immutable snapshots.
//!
//! ## Model
//!
//! - The stack starts with an initial "zero" entry that is never removed.
//! - [`HistoryEngine::commit`] appends a copy of a new value, discarding any
//!   redo entries beyond the current position. A value equal to the current
//!   entry is ignored, so no-op edits do not create undo steps.
//! - [`HistoryEngine::undo`] / [`HistoryEngine::redo`] move the current
//!   position and are clamped at both ends.
//! - Every position change is published to a `watch` channel and to
//!   registered subscribers.
//!
//! ## Ordering
//!
//! Commits are queued to a single worker task and acknowledged through a
//! [`CommitHandle`]. Stack order always matches the order of `commit` calls,
//! even when handles are awaited out of order.
//!
//! ```text
//! commit(v) ──► queue ──► worker: dedupe, truncate, push, publish ──► ack
//! undo()/redo() ──► move depth, publish
//! ```

mod engine;
pub mod error;
mod snapshot;
mod subscribers;

pub use engine::{CommitHandle, CommitOutcome, HistoryEngine};
pub use error::{HistoryError, HistoryResult};
pub use snapshot::{HistorySnapshot, Snapshot};
pub use subscribers::SubscriptionId;
