//! batchpress-core: batch video transcode orchestration.
//!
//! The library drives an external encoding tool once per file over a
//! user-selected batch, aggregates per-file progress into a whole-batch
//! percentage, and supports mid-batch cancellation with guaranteed process
//! teardown. Front-ends consume a [`runner::BatchEvent`] channel and never
//! get called back into.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use batchpress_core::runner::{event_channel, BatchRequest, BatchSettings, JobRunner};
//! use batchpress_core::transcoder::{FfmpegTranscoder, TranscoderConfig};
//!
//! let transcoder = Arc::new(FfmpegTranscoder::new(TranscoderConfig::default()));
//! let (events, mut rx) = event_channel(256);
//! let runner = JobRunner::new(transcoder, events);
//!
//! runner.start(BatchRequest {
//!     files: vec!["a.mkv".into(), "b.mp4".into()],
//!     settings: BatchSettings::default(),
//! }).await?;
//!
//! while let Some(event) = rx.recv().await {
//!     println!("{event:?}");
//! }
//! ```

pub mod command;
pub mod config;
pub mod encoder;
pub mod estimate;
pub mod probe;
pub mod runner;
pub mod testing;
pub mod transcoder;
pub mod util;

pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use runner::{
    event_channel, BatchEvent, BatchOutcome, BatchPhase, BatchRequest, BatchSettings, JobRunner,
    RunnerConfig, StartError,
};
pub use transcoder::{FfmpegTranscoder, TranscodeError, Transcoder, TranscoderConfig};
