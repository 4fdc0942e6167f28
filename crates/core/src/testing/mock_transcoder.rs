//! Mock transcoder for testing.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use crate::probe::ProbeInfo;
use crate::transcoder::{
    CancelToken, TranscodeError, TranscodeOutcome, TranscodeTask, Transcoder,
};

/// A recorded transcode invocation for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTranscode {
    pub task: TranscodeTask,
    pub success: bool,
}

/// Mock implementation of the [`Transcoder`] trait.
///
/// Controllable behavior:
/// - scripted probe results per path, plus failure injection
/// - a configurable available-encoder set (or a failing enumeration)
/// - a scripted per-file progress schedule with a step delay
/// - transcode failure injection and recorded invocations
/// - cancellation observed between progress steps, like the real tool
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    probe_results: Arc<RwLock<HashMap<PathBuf, ProbeInfo>>>,
    probe_failures: Arc<RwLock<HashSet<PathBuf>>>,
    probe_calls: Arc<RwLock<usize>>,
    encoders: Arc<RwLock<HashSet<String>>>,
    enumeration_fails: Arc<RwLock<bool>>,
    progress_steps: Arc<RwLock<Vec<f32>>>,
    step_delay_ms: Arc<RwLock<u64>>,
    hold_until_cancel: Arc<RwLock<bool>>,
    next_error: Arc<RwLock<Option<TranscodeError>>>,
    transcodes: Arc<RwLock<Vec<RecordedTranscode>>>,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscoder {
    pub fn new() -> Self {
        Self {
            probe_results: Arc::new(RwLock::new(HashMap::new())),
            probe_failures: Arc::new(RwLock::new(HashSet::new())),
            probe_calls: Arc::new(RwLock::new(0)),
            encoders: Arc::new(RwLock::new(HashSet::new())),
            enumeration_fails: Arc::new(RwLock::new(false)),
            progress_steps: Arc::new(RwLock::new(vec![25.0, 50.0, 75.0, 100.0])),
            step_delay_ms: Arc::new(RwLock::new(2)),
            hold_until_cancel: Arc::new(RwLock::new(false)),
            next_error: Arc::new(RwLock::new(None)),
            transcodes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Sets the probe result for a path.
    pub async fn set_probe_result(&self, path: impl AsRef<Path>, info: ProbeInfo) {
        self.probe_results
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), info);
    }

    /// Makes probing fail for a path.
    pub async fn fail_probe_for(&self, path: impl AsRef<Path>) {
        self.probe_failures
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Number of probe invocations that reached the mock.
    pub async fn probe_count(&self) -> usize {
        *self.probe_calls.read().await
    }

    /// Sets the available encoder set.
    pub async fn set_encoders(&self, names: &[&str]) {
        *self.encoders.write().await = names.iter().map(|s| s.to_string()).collect();
    }

    /// Makes encoder enumeration fail.
    pub async fn fail_enumeration(&self) {
        *self.enumeration_fails.write().await = true;
    }

    /// Sets the per-file progress schedule (percent values, in order).
    pub async fn set_progress_steps(&self, steps: Vec<f32>) {
        *self.progress_steps.write().await = steps;
    }

    /// Sets the delay between progress steps.
    pub async fn set_step_delay(&self, delay: Duration) {
        *self.step_delay_ms.write().await = delay.as_millis() as u64;
    }

    /// After the schedule runs dry, park until cancelled instead of
    /// finishing. Lets tests cancel deterministically mid-file.
    pub async fn set_hold_until_cancel(&self, hold: bool) {
        *self.hold_until_cancel.write().await = hold;
    }

    /// Configures the next transcode to fail with the given error.
    pub async fn set_next_error(&self, error: TranscodeError) {
        *self.next_error.write().await = Some(error);
    }

    /// All recorded transcode invocations.
    pub async fn recorded_transcodes(&self) -> Vec<RecordedTranscode> {
        self.transcodes.read().await.clone()
    }

    /// Number of transcode invocations.
    pub async fn transcode_count(&self) -> usize {
        self.transcodes.read().await.len()
    }

    fn default_info() -> ProbeInfo {
        ProbeInfo {
            duration_secs: 60.0,
            video_codec: Some("h264".to_string()),
            audio_codec: Some("aac".to_string()),
            audio_bitrate_kbps: Some(128.0),
            video_width: Some(1920),
            video_height: Some(1080),
            video_fps: Some(25.0),
        }
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<ProbeInfo, TranscodeError> {
        *self.probe_calls.write().await += 1;

        if self.probe_failures.read().await.contains(path) {
            return Err(TranscodeError::probe_failed("scripted probe failure"));
        }
        if let Some(info) = self.probe_results.read().await.get(path) {
            return Ok(info.clone());
        }
        Ok(Self::default_info())
    }

    async fn available_encoders(&self) -> Result<HashSet<String>, TranscodeError> {
        if *self.enumeration_fails.read().await {
            return Err(TranscodeError::process_failed("scripted enumeration failure", None));
        }
        Ok(self.encoders.read().await.clone())
    }

    async fn transcode(
        &self,
        task: TranscodeTask,
        progress_tx: mpsc::Sender<f32>,
        cancel: &CancelToken,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        if let Some(err) = self.next_error.write().await.take() {
            self.transcodes.write().await.push(RecordedTranscode {
                task,
                success: false,
            });
            return Err(err);
        }

        self.transcodes.write().await.push(RecordedTranscode {
            task: task.clone(),
            success: true,
        });

        let steps = self.progress_steps.read().await.clone();
        let delay = Duration::from_millis(*self.step_delay_ms.read().await);

        for percent in steps {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(TranscodeOutcome::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
            let _ = progress_tx.send(percent).await;
        }

        if *self.hold_until_cancel.read().await {
            cancel.cancelled().await;
            return Ok(TranscodeOutcome::Cancelled);
        }

        Ok(TranscodeOutcome::Finished)
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        Ok(())
    }
}
