use serde::{Deserialize, Serialize};

use crate::runner::RunnerConfig;
use crate::transcoder::TranscoderConfig;

/// Root configuration. Every section has workable defaults, so an absent
/// config file is equivalent to an empty one.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub transcoder: TranscoderConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.transcoder.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.runner.event_buffer, 256);
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
[transcoder]
ffmpeg_log_level = "error"

[runner]
event_buffer = 64
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.transcoder.ffmpeg_log_level, "error");
        assert_eq!(config.transcoder.termination_grace_secs, 3);
        assert_eq!(config.runner.event_buffer, 64);
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.transcoder.termination_grace_secs,
            config.transcoder.termination_grace_secs
        );
    }
}
