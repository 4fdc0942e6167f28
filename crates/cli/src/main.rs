mod cli;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use batchpress_core::encoder::{resolve_rate, select_encoder, RateControl};
use batchpress_core::estimate::{estimated_size_mb, estimated_time_secs};
use batchpress_core::runner::{event_channel, BatchEvent, BatchOutcome, BatchRequest, JobRunner};
use batchpress_core::transcoder::Transcoder;
use batchpress_core::{load_config, validate_config, Config, FfmpegTranscoder};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = cli::Args::parse();

    let log_path = init_logging()?;
    info!("Logging this run to {}", log_path.display());

    // Load configuration (optional file, env overrides via figment).
    let config = match &args.config {
        Some(path) => {
            load_config(path).with_context(|| format!("Failed to load config from {path:?}"))?
        }
        None => {
            let default_path = Path::new("batchpress.toml");
            if default_path.exists() {
                load_config(default_path).context("Failed to load batchpress.toml")?
            } else {
                Config::default()
            }
        }
    };
    validate_config(&config).context("Configuration validation failed")?;

    let request = args.to_batch_request()?;

    let transcoder = Arc::new(FfmpegTranscoder::new(config.transcoder.clone()));

    // Pre-flight: a completely missing tool is caught here, before any
    // batch starts; the orchestrator itself never aborts for it.
    transcoder
        .validate()
        .await
        .context("ffmpeg/ffprobe not available")?;

    print_estimates(transcoder.as_ref(), &request).await;

    let (events, mut rx) = event_channel(config.runner.event_buffer);
    let runner = JobRunner::new(Arc::clone(&transcoder), events);
    runner.start(request).await?;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    if render_event(&event) {
                        break;
                    }
                }
                None => break,
            },
            _ = signal::ctrl_c() => {
                info!("Cancellation requested; tearing down the active transcode");
                runner.cancel().await;
            }
        }
    }

    Ok(())
}

/// Stderr layer for the console plus a per-run log file, one line per event.
fn init_logging() -> Result<PathBuf> {
    let log_path = PathBuf::from(format!(
        "batchpress_{}.log",
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    ));
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    Ok(log_path)
}

/// Probes the batch up front and prints rough size/time expectations.
async fn print_estimates(transcoder: &FfmpegTranscoder, request: &BatchRequest) {
    let settings = &request.settings;
    let available = transcoder.available_encoders().await.unwrap_or_default();
    let choice = select_encoder(settings.codec, &available);
    let resolved = resolve_rate(settings.rate, settings.codec);

    let mut total_secs = 0.0;
    let mut total_size_mb = 0.0;
    for file in &request.files {
        let info = match transcoder.probe(file).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Could not probe {} for estimates: {e}", file.display());
                continue;
            }
        };
        let target = settings
            .crops
            .get(file)
            .map(|c| c.duration_secs())
            .unwrap_or(info.duration_secs);
        total_secs += target;
        if let RateControl::Bitrate(kbps) = resolved.control {
            total_size_mb += estimated_size_mb(kbps, target, info.audio_bitrate_kbps);
        }
    }

    match resolved.control {
        RateControl::Bitrate(_) => {
            info!("Estimated total size: {total_size_mb:.2} MB");
        }
        RateControl::Quality(_) => {
            info!("Estimated total size: depends on CRF/CQ");
        }
    }
    let time_secs = estimated_time_secs(
        total_secs,
        settings.preset,
        settings.codec,
        choice.is_hardware(),
    );
    info!("Estimated time: {:.1} min", time_secs / 60.0);
}

/// Renders one batch event. Returns true once the batch is finished.
fn render_event(event: &BatchEvent) -> bool {
    match event {
        BatchEvent::EncoderSelected {
            encoder,
            hardware,
            preset_token,
        } => {
            let kind = if *hardware { "hardware" } else { "software" };
            info!("Selected {kind} encoder {encoder} (preset {preset_token})");
        }
        BatchEvent::RateClamped { requested, applied } => {
            warn!("Rate value {requested} out of range, using {applied}");
        }
        BatchEvent::FileStarted {
            index,
            total,
            input,
            output,
            stream_copy,
        } => {
            let mode = if *stream_copy { "stream copy" } else { "encode" };
            info!(
                "({index}/{total}) {} -> {} [{mode}]",
                input.display(),
                output.display()
            );
        }
        BatchEvent::Progress { percent } => {
            info!("Overall progress: {percent}%");
        }
        BatchEvent::FileProgress {
            index,
            total,
            file_name,
            percent,
        } => {
            info!("({index}/{total}) {file_name} - {percent}%");
        }
        BatchEvent::ProbeWarning { path, reason } => {
            warn!("Probe failed for {}: {reason}", path.display());
        }
        BatchEvent::FileSkipped { path, reason } => {
            warn!("Skipping {}: {reason}", path.display());
        }
        BatchEvent::FileFailed { path, reason } => {
            error!("Error converting {}: {reason}", path.display());
        }
        BatchEvent::FileCompleted { index, total, output } => {
            info!("({index}/{total}) Completed: {}", output.display());
        }
        BatchEvent::BatchFinished { outcome } => {
            match outcome {
                BatchOutcome::Completed => info!("Batch completed"),
                BatchOutcome::Cancelled => info!("Batch cancelled"),
            }
            return true;
        }
    }
    false
}
