//! Types shared across the transcoder seam.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// A fully built transcode invocation for one file.
#[derive(Debug, Clone)]
pub struct TranscodeTask {
    /// Complete argument list (program name excluded).
    pub args: Vec<String>,
    /// Frames the output is expected to contain, when the source frame rate
    /// is known. Drives `frame=N` progress; `None` falls back to timestamps.
    pub expected_frames: Option<u64>,
    /// Target output duration in seconds, for the timestamp fallback.
    pub target_duration_secs: f64,
}

/// How a transcode run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeOutcome {
    /// The process ran to successful completion.
    Finished,
    /// The run was cancelled; the process has been torn down.
    Cancelled,
}

/// Cooperative cancellation signal shared between the batch worker and the
/// caller. Tripping it is idempotent and wakes every pending waiter.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register with the notifier before re-checking the flag; a
            // cancel between the check and the await cannot be missed.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
