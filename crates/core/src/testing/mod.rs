//! Testing utilities.
//!
//! [`MockTranscoder`] implements the [`crate::transcoder::Transcoder`] seam
//! with scripted behavior so runner lifecycle tests run without ffmpeg.

mod mock_transcoder;

pub use mock_transcoder::{MockTranscoder, RecordedTranscode};
