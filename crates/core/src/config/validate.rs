use super::{types::Config, ConfigError};

const FFMPEG_LOG_LEVELS: &[&str] = &[
    "quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug", "trace",
];

/// Validate configuration beyond what deserialization enforces
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if !FFMPEG_LOG_LEVELS.contains(&config.transcoder.ffmpeg_log_level.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "unknown ffmpeg log level: {} (expected one of {})",
            config.transcoder.ffmpeg_log_level,
            FFMPEG_LOG_LEVELS.join(", ")
        )));
    }

    if config.transcoder.termination_grace_secs == 0 {
        return Err(ConfigError::Invalid(
            "termination_grace_secs must be at least 1".to_string(),
        ));
    }

    if config.runner.event_buffer == 0 {
        return Err(ConfigError::Invalid(
            "runner event_buffer must be at least 1".to_string(),
        ));
    }

    Ok(())
}
