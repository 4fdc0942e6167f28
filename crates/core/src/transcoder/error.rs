//! Error types for the transcoder seam.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while probing or transcoding.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// ffmpeg binary not found.
    #[error("ffmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// ffprobe binary not found.
    #[error("ffprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Probe invocation failed or produced unusable output.
    #[error("failed to probe media file: {reason}")]
    ProbeFailed { reason: String },

    /// The transcode process exited with a failure status.
    #[error("transcode failed ({reason})")]
    ProcessFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// I/O error talking to the external process.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscodeError {
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }

    pub fn process_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProcessFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
