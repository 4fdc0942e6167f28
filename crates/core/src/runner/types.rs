//! Types for the batch runner.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::{AudioPolicy, Container, CropRange};
use crate::encoder::{CodecFamily, Preset, RateRequest};

/// User-facing settings for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Target codec family.
    pub codec: CodecFamily,
    /// Output container.
    pub container: Container,
    /// Abstract speed/quality preset.
    pub preset: Preset,
    /// Rate control request (clamped during start).
    pub rate: RateRequest,
    /// Audio handling.
    pub audio: AudioPolicy,
    /// Skip re-encoding when the source codec already matches the target.
    pub smart_copy: bool,
    /// Output directory; `None` means next to each input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Per-file trim ranges.
    #[serde(default)]
    pub crops: HashMap<PathBuf, CropRange>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            codec: CodecFamily::Hevc,
            container: Container::Mp4,
            preset: Preset::Medium,
            rate: RateRequest::Bitrate(2000),
            audio: AudioPolicy::Copy,
            smart_copy: true,
            output_dir: None,
            crops: HashMap::new(),
        }
    }
}

/// A batch start request: the ordered file list plus settings.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub files: Vec<PathBuf>,
    pub settings: BatchSettings,
}

/// Where the runner currently is. `Running` carries the zero-based index of
/// the file being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum BatchPhase {
    Idle,
    Running { index: usize },
    Completed,
    Cancelled,
}

impl BatchPhase {
    /// Whether a new batch may be started from this phase.
    pub fn accepts_start(&self) -> bool {
        !matches!(self, Self::Running { .. })
    }
}

/// Why a start request was rejected. The runner stays in its current phase.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("no input files selected")]
    EmptyBatch,

    #[error("a batch is already running")]
    AlreadyRunning,

    #[error("invalid crop range for {path}: end must be after start")]
    InvalidCrop { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = BatchSettings::default();
        assert_eq!(settings.codec, CodecFamily::Hevc);
        assert_eq!(settings.container, Container::Mp4);
        assert_eq!(settings.preset, Preset::Medium);
        assert_eq!(settings.rate, RateRequest::Bitrate(2000));
        assert!(settings.smart_copy);
        assert!(settings.crops.is_empty());
    }

    #[test]
    fn test_phase_accepts_start() {
        assert!(BatchPhase::Idle.accepts_start());
        assert!(BatchPhase::Completed.accepts_start());
        assert!(BatchPhase::Cancelled.accepts_start());
        assert!(!BatchPhase::Running { index: 0 }.accepts_start());
    }

    #[test]
    fn test_settings_round_trip() {
        let mut settings = BatchSettings::default();
        settings
            .crops
            .insert(PathBuf::from("/a.mkv"), CropRange { start: 5, end: 65 });
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: BatchSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.crops[&PathBuf::from("/a.mkv")].end, 65);
    }
}
