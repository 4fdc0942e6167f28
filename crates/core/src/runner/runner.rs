//! The batch job runner.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{info, warn};

use crate::command::{build_args, resolve_output_path, Job};
use crate::encoder::{
    map_preset, resolve_rate, select_encoder, EncoderChoice, RateControl,
};
use crate::probe::MediaProber;
use crate::transcoder::{
    CancelToken, TranscodeError, TranscodeOutcome, TranscodeTask, Transcoder,
};

use super::events::{BatchEvent, BatchOutcome, EventSink};
use super::progress::ProgressAggregator;
use super::types::{BatchPhase, BatchRequest, BatchSettings, StartError};

/// Drives a batch of files through probe → encoder selection → command
/// build → transcode, one file and one external process at a time.
///
/// The runner handle stays with the caller; the batch itself runs on a
/// spawned worker task and reports through the event channel. `cancel()`
/// may be called concurrently at any point.
pub struct JobRunner<T: Transcoder + 'static> {
    transcoder: Arc<T>,
    events: EventSink,
    phase: Arc<RwLock<BatchPhase>>,
    cancel: Mutex<CancelToken>,
}

impl<T: Transcoder + 'static> JobRunner<T> {
    pub fn new(transcoder: Arc<T>, events: EventSink) -> Self {
        Self {
            transcoder,
            events,
            phase: Arc::new(RwLock::new(BatchPhase::Idle)),
            cancel: Mutex::new(CancelToken::new()),
        }
    }

    /// Current phase of the runner.
    pub async fn phase(&self) -> BatchPhase {
        *self.phase.read().await
    }

    /// Starts a batch. Rejected while a batch is live and on invalid input;
    /// on rejection the runner keeps its current phase.
    pub async fn start(&self, request: BatchRequest) -> Result<(), StartError> {
        {
            let mut phase = self.phase.write().await;
            if !phase.accepts_start() {
                return Err(StartError::AlreadyRunning);
            }
            if request.files.is_empty() {
                return Err(StartError::EmptyBatch);
            }
            for (path, crop) in &request.settings.crops {
                if crop.end <= crop.start {
                    return Err(StartError::InvalidCrop { path: path.clone() });
                }
            }
            *phase = BatchPhase::Running { index: 0 };
        }

        let token = CancelToken::new();
        *self.cancel.lock().await = token.clone();

        let worker = BatchWorker {
            transcoder: Arc::clone(&self.transcoder),
            events: self.events.clone(),
            phase: Arc::clone(&self.phase),
            cancel: token,
            files: request.files,
            settings: request.settings,
        };
        tokio::spawn(worker.run());

        Ok(())
    }

    /// Requests cancellation of the running batch. The active process is
    /// torn down and no further file starts. A no-op when nothing runs.
    pub async fn cancel(&self) {
        self.cancel.lock().await.cancel();
    }
}

/// How one file's run ended, from the worker's point of view.
enum FileRun {
    Finished { output: PathBuf },
    Cancelled,
}

/// Per-batch worker state, owned by the spawned task.
struct BatchWorker<T: Transcoder> {
    transcoder: Arc<T>,
    events: EventSink,
    phase: Arc<RwLock<BatchPhase>>,
    cancel: CancelToken,
    files: Vec<PathBuf>,
    settings: BatchSettings,
}

impl<T: Transcoder + 'static> BatchWorker<T> {
    async fn run(self) {
        let outcome = self.execute().await;

        *self.phase.write().await = match outcome {
            BatchOutcome::Completed => BatchPhase::Completed,
            BatchOutcome::Cancelled => BatchPhase::Cancelled,
        };
        self.events.emit(BatchEvent::BatchFinished { outcome }).await;
    }

    async fn execute(&self) -> BatchOutcome {
        let available = match self.transcoder.available_encoders().await {
            Ok(set) => set,
            Err(e) => {
                warn!("encoder enumeration failed, assuming none available: {e}");
                HashSet::new()
            }
        };
        let choice = select_encoder(self.settings.codec, &available);
        let preset_token = map_preset(choice.encoder, self.settings.preset);
        self.events
            .emit(BatchEvent::EncoderSelected {
                encoder: choice.encoder.name().to_string(),
                hardware: choice.is_hardware(),
                preset_token: preset_token.to_string(),
            })
            .await;

        let resolved = resolve_rate(self.settings.rate, self.settings.codec);
        if let Some(requested) = resolved.clamped_from {
            self.events
                .emit(BatchEvent::RateClamped {
                    requested,
                    applied: resolved.control.value(),
                })
                .await;
        }
        let rate = resolved.control;

        // Totals pass: probe every file once (warm cache) and fix the
        // progress denominator for the whole run.
        let mut prober = MediaProber::new(Arc::clone(&self.transcoder));
        let mut targets = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let (info, probe_err) = prober.probe(file).await;
            if let Some(e) = probe_err {
                self.events
                    .emit(BatchEvent::ProbeWarning {
                        path: file.clone(),
                        reason: e.to_string(),
                    })
                    .await;
            }
            let target = match self.settings.crops.get(file) {
                Some(crop) => crop.duration_secs(),
                None => info.duration_secs.max(0.0),
            };
            targets.push(target);
        }
        let mut aggregator = ProgressAggregator::new(targets.iter().sum());

        let total_files = self.files.len();
        for index in 0..total_files {
            if self.cancel.is_cancelled() {
                return BatchOutcome::Cancelled;
            }
            *self.phase.write().await = BatchPhase::Running { index };

            let file = self.files[index].clone();
            if !file.exists() {
                self.events
                    .emit(BatchEvent::FileSkipped {
                        path: file,
                        reason: "file not found".to_string(),
                    })
                    .await;
                continue;
            }

            let run = self
                .process_file(
                    index,
                    &file,
                    targets[index],
                    choice,
                    preset_token,
                    rate,
                    &mut prober,
                    &mut aggregator,
                )
                .await;

            match run {
                Ok(FileRun::Finished { output }) => {
                    let percent = aggregator.complete_file(targets[index]);
                    self.events.emit(BatchEvent::Progress { percent }).await;
                    self.events
                        .emit(BatchEvent::FileCompleted {
                            index: index + 1,
                            total: total_files,
                            output,
                        })
                        .await;
                }
                Ok(FileRun::Cancelled) => return BatchOutcome::Cancelled,
                Err(e) => {
                    // One file's failure never aborts the batch.
                    self.events
                        .emit(BatchEvent::FileFailed {
                            path: file,
                            reason: e.to_string(),
                        })
                        .await;
                }
            }
        }

        if self.cancel.is_cancelled() {
            BatchOutcome::Cancelled
        } else {
            BatchOutcome::Completed
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn process_file(
        &self,
        index: usize,
        file: &Path,
        target_secs: f64,
        choice: EncoderChoice,
        preset_token: &'static str,
        rate: RateControl,
        prober: &mut MediaProber<T>,
        aggregator: &mut ProgressAggregator,
    ) -> Result<FileRun, TranscodeError> {
        // Cached since the totals pass; re-probing here is free.
        let (info, _) = prober.probe(file).await;

        if let Some(dir) = &self.settings.output_dir {
            tokio::fs::create_dir_all(dir).await?;
        }
        let output =
            resolve_output_path(file, self.settings.output_dir.as_deref(), self.settings.container);

        let job = Job {
            input: file.to_path_buf(),
            output: output.clone(),
            crop: self.settings.crops.get(file).copied(),
            encoder: choice,
            preset_token,
            rate,
            audio: self.settings.audio,
            container: self.settings.container,
            smart_copy: self.settings.smart_copy,
            source_video_codec: info.video_codec.clone(),
        };
        let stream_copy = job.is_stream_copy();
        let args = build_args(&job);

        let expected_frames = info.video_fps.and_then(|fps| {
            (fps > 0.0 && target_secs > 0.0)
                .then(|| ((target_secs * f64::from(fps)).round() as u64).max(1))
        });
        let task = TranscodeTask {
            args,
            expected_frames,
            target_duration_secs: target_secs,
        };

        let total = self.files.len();
        self.events
            .emit(BatchEvent::FileStarted {
                index: index + 1,
                total,
                input: file.to_path_buf(),
                output: output.clone(),
                stream_copy,
            })
            .await;
        info!(
            file = %file.display(),
            encoder = choice.encoder.name(),
            stream_copy,
            "starting transcode"
        );

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (progress_tx, mut progress_rx) = mpsc::channel(32);
        let transcode = self.transcoder.transcode(task, progress_tx, &self.cancel);
        tokio::pin!(transcode);

        let mut last_file_percent: i32 = -1;
        loop {
            tokio::select! {
                result = &mut transcode => {
                    return match result? {
                        TranscodeOutcome::Finished => Ok(FileRun::Finished { output }),
                        TranscodeOutcome::Cancelled => Ok(FileRun::Cancelled),
                    };
                }
                Some(percent) = progress_rx.recv() => {
                    if let Some(overall) = aggregator.file_progress(percent, target_secs) {
                        self.events.emit(BatchEvent::Progress { percent: overall }).await;
                    }
                    let file_percent = percent.clamp(0.0, 100.0) as i32;
                    if file_percent > last_file_percent {
                        last_file_percent = file_percent;
                        self.events
                            .emit(BatchEvent::FileProgress {
                                index: index + 1,
                                total,
                                file_name: file_name.clone(),
                                percent: file_percent as u8,
                            })
                            .await;
                    }
                }
            }
        }
    }
}
