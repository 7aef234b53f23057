//! Staleness-aware refresh loop for one tracked account and its posts.
//!
//! The [`Tracker`] owns no durable state: every tick it re-reads the latest
//! snapshot times from a [`SnapshotSink`], decides what is due, and pulls
//! fresh pages through an [`AnalyticsFetcher`].

pub mod error;
pub mod fetch;
pub mod scheduler;
pub mod sink;

pub use error::TrackerError;
pub use fetch::AnalyticsFetcher;
pub use scheduler::{next_sleep, TickReport, Tracker};
pub use sink::{PgSink, SnapshotSink};
