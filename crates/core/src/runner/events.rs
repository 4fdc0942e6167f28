//! Batch event channel.
//!
//! The runner reports to its caller exclusively through [`BatchEvent`]s
//! sent over an mpsc channel; it holds no reference back into whatever
//! front-end is listening.

use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::mpsc;

/// Terminal state of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Completed,
    Cancelled,
}

/// Events emitted during a batch run.
///
/// File indices are 1-based, matching the "(2/5) name" display convention.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    /// The encoder backend chosen for this run.
    EncoderSelected {
        encoder: String,
        hardware: bool,
        preset_token: String,
    },
    /// A rate value was outside its bounds and has been adjusted.
    RateClamped { requested: i64, applied: u32 },
    /// A file's transcode process is about to start.
    FileStarted {
        index: usize,
        total: usize,
        input: PathBuf,
        output: PathBuf,
        stream_copy: bool,
    },
    /// Whole-batch progress changed.
    Progress { percent: u8 },
    /// Per-file progress changed.
    FileProgress {
        index: usize,
        total: usize,
        file_name: String,
        percent: u8,
    },
    /// A file could not be probed; it contributes no duration weight.
    ProbeWarning { path: PathBuf, reason: String },
    /// A missing input was skipped.
    FileSkipped { path: PathBuf, reason: String },
    /// A file's transcode failed; the batch continues.
    FileFailed { path: PathBuf, reason: String },
    /// A file finished cleanly.
    FileCompleted {
        index: usize,
        total: usize,
        output: PathBuf,
    },
    /// The batch reached a terminal state.
    BatchFinished { outcome: BatchOutcome },
}

/// Sender half of the event channel.
///
/// Cheaply cloneable. Emitting never fails the caller: a closed or lagging
/// channel is logged and dropped.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<BatchEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<BatchEvent>) -> Self {
        Self { tx }
    }

    /// Emits an event, waiting for channel capacity.
    pub async fn emit(&self, event: BatchEvent) {
        if let Err(e) = self.tx.send(event).await {
            tracing::debug!("event receiver gone, dropping event: {}", e);
        }
    }
}

/// Creates the event channel: the sink goes to the runner, the receiver to
/// the front-end (or a test harness).
pub fn event_channel(buffer: usize) -> (EventSink, mpsc::Receiver<BatchEvent>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSink::new(tx), rx)
}
