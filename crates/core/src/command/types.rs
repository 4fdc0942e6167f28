//! Job model for a single file's transcode invocation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::encoder::{EncoderChoice, RateControl};

/// Trim boundaries in whole seconds, `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRange {
    pub start: u32,
    pub end: u32,
}

impl CropRange {
    /// Target duration of the cropped output in seconds.
    pub fn duration_secs(&self) -> f64 {
        f64::from(self.end.saturating_sub(self.start))
    }
}

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    Mp4,
    Mkv,
}

impl Container {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "mkv",
        }
    }
}

/// Supported audio re-encode targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    /// Widely supported, the natural MP4 choice.
    Aac,
    /// Efficient, the natural MKV choice.
    Opus,
}

impl AudioCodec {
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Aac => "aac",
            Self::Opus => "libopus",
        }
    }
}

/// What to do with audio streams when re-encoding video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum AudioPolicy {
    /// Copy audio streams verbatim.
    Copy,
    /// Re-encode to `codec` at `bitrate_kbps`.
    Encode { codec: AudioCodec, bitrate_kbps: u32 },
}

/// One file's fully resolved transcode job. Immutable once constructed;
/// consumed exactly once by the runner.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub crop: Option<CropRange>,
    pub encoder: EncoderChoice,
    pub preset_token: &'static str,
    pub rate: RateControl,
    pub audio: AudioPolicy,
    pub container: Container,
    /// Whether the user enabled automatic stream copy on codec match.
    pub smart_copy: bool,
    /// Video codec of the source, as probed.
    pub source_video_codec: Option<String>,
}

impl Job {
    /// The smart-copy fast path: skip re-encoding entirely when the source
    /// is already in the target codec family. Decided on codec equality
    /// alone; an active crop range is passed through to the copy.
    pub fn is_stream_copy(&self) -> bool {
        self.smart_copy
            && self
                .source_video_codec
                .as_deref()
                .is_some_and(|codec| codec.eq_ignore_ascii_case(self.encoder.family.codec_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{CodecFamily, Encoder};

    fn job(smart_copy: bool, source_codec: Option<&str>) -> Job {
        Job {
            input: PathBuf::from("/in/a.mkv"),
            output: PathBuf::from("/out/a_converted.mp4"),
            crop: None,
            encoder: EncoderChoice {
                encoder: Encoder::X265,
                family: CodecFamily::Hevc,
            },
            preset_token: "medium",
            rate: RateControl::Bitrate(2000),
            audio: AudioPolicy::Copy,
            container: Container::Mp4,
            smart_copy,
            source_video_codec: source_codec.map(String::from),
        }
    }

    #[test]
    fn test_crop_duration() {
        let crop = CropRange { start: 10, end: 70 };
        assert_eq!(crop.duration_secs(), 60.0);
    }

    #[test]
    fn test_stream_copy_requires_matching_codec() {
        assert!(job(true, Some("hevc")).is_stream_copy());
        assert!(job(true, Some("HEVC")).is_stream_copy());
        assert!(!job(true, Some("h264")).is_stream_copy());
        assert!(!job(true, None).is_stream_copy());
    }

    #[test]
    fn test_stream_copy_requires_opt_in() {
        assert!(!job(false, Some("hevc")).is_stream_copy());
    }

    #[test]
    fn test_container_extensions() {
        assert_eq!(Container::Mp4.extension(), "mp4");
        assert_eq!(Container::Mkv.extension(), "mkv");
    }
}
