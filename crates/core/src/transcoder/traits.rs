//! Trait definition for the transcoder seam.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::probe::ProbeInfo;

use super::error::TranscodeError;
use super::types::{CancelToken, TranscodeOutcome, TranscodeTask};

/// The external transcoding tool, abstracted for testability.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Name of this implementation.
    fn name(&self) -> &str;

    /// Probes a media file.
    async fn probe(&self, path: &Path) -> Result<ProbeInfo, TranscodeError>;

    /// Enumerates the encoder identifiers the tool was built with.
    async fn available_encoders(&self) -> Result<HashSet<String>, TranscodeError>;

    /// Runs one transcode task to completion, streaming per-file progress
    /// percentages (0-100) through `progress_tx`.
    ///
    /// Cancellation is observed between progress updates; on cancellation
    /// the process is torn down (graceful stop, bounded grace period,
    /// forced kill) and `Ok(TranscodeOutcome::Cancelled)` is returned —
    /// cancellation is not an error. If the receiver side of `progress_tx`
    /// goes away the transcode keeps running without progress reporting.
    async fn transcode(
        &self,
        task: TranscodeTask,
        progress_tx: mpsc::Sender<f32>,
        cancel: &CancelToken,
    ) -> Result<TranscodeOutcome, TranscodeError>;

    /// Checks that the tool is present and runnable.
    async fn validate(&self) -> Result<(), TranscodeError>;
}
