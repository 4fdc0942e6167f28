//! Probe result types.

use serde::{Deserialize, Serialize};

/// Information about a media file, as reported by the probing tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeInfo {
    /// Container-level duration in seconds.
    pub duration_secs: f64,
    /// Codec of the first video stream (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    /// Codec of the first audio stream (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    /// Bitrate of the first audio stream in kbps (if reported).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_bitrate_kbps: Option<f64>,
    /// Video width in pixels (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_width: Option<u32>,
    /// Video height in pixels (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_height: Option<u32>,
    /// Video frame rate (if reported).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_fps: Option<f32>,
}

impl ProbeInfo {
    /// The value a failed probe resolves to: zero duration, nothing known.
    pub fn sentinel() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_empty() {
        let info = ProbeInfo::sentinel();
        assert_eq!(info.duration_secs, 0.0);
        assert!(info.video_codec.is_none());
        assert!(info.audio_codec.is_none());
        assert!(info.audio_bitrate_kbps.is_none());
        assert!(info.video_fps.is_none());
    }
}
