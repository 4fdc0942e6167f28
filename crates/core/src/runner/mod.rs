//! The sequential batch runner.
//!
//! [`JobRunner`] owns the batch state machine: it probes, selects an
//! encoder, builds and spawns one transcode process at a time, aggregates
//! per-file progress into a whole-batch percentage, and reports everything
//! through an event channel. The caller keeps the runner handle to cancel.

mod config;
mod events;
mod progress;
mod runner;
mod types;

pub use config::RunnerConfig;
pub use events::{event_channel, BatchEvent, BatchOutcome, EventSink};
pub use progress::ProgressAggregator;
pub use runner::JobRunner;
pub use types::{BatchPhase, BatchRequest, BatchSettings, StartError};
