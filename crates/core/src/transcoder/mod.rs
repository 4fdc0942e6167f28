//! The seam to the external transcoding tool.
//!
//! All ffmpeg/ffprobe interaction goes through the [`Transcoder`] trait so
//! the batch runner can be exercised against a mock. [`FfmpegTranscoder`]
//! is the real implementation.

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::TranscoderConfig;
pub use error::TranscodeError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::{CancelToken, TranscodeOutcome, TranscodeTask};
