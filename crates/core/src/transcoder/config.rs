//! Configuration for the ffmpeg-based transcoder.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for [`super::FfmpegTranscoder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// Path to the ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to the ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// ffmpeg log level for the stderr channel
    /// (quiet, panic, fatal, error, warning, info, verbose, debug).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,

    /// Additional global ffmpeg arguments, inserted before the per-job ones.
    #[serde(default)]
    pub extra_ffmpeg_args: Vec<String>,

    /// How long a cancelled process gets to quit gracefully before it is
    /// killed, in seconds.
    #[serde(default = "default_grace")]
    pub termination_grace_secs: u64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_log_level() -> String {
    "warning".to_string()
}

fn default_grace() -> u64 {
    3
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            ffmpeg_log_level: default_log_level(),
            extra_ffmpeg_args: Vec::new(),
            termination_grace_secs: default_grace(),
        }
    }
}

impl TranscoderConfig {
    /// Creates a config with custom ffmpeg/ffprobe paths.
    pub fn with_paths(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranscoderConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(config.ffmpeg_log_level, "warning");
        assert_eq!(config.termination_grace_secs, 3);
        assert!(config.extra_ffmpeg_args.is_empty());
    }

    #[test]
    fn test_deserialize_partial() {
        let toml = r#"
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
            termination_grace_secs = 10
        "#;
        let config: TranscoderConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.termination_grace_secs, 10);
        assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
    }
}
