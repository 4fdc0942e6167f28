//! FFmpeg-based transcoder implementation.

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use regex_lite::Regex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;

use crate::probe::{parse_ffprobe_json, ProbeInfo};

use super::config::TranscoderConfig;
use super::error::TranscodeError;
use super::traits::Transcoder;
use super::types::{CancelToken, TranscodeOutcome, TranscodeTask};

/// How many trailing stderr lines to keep for failure reports.
const STDERR_TAIL_LINES: usize = 32;

/// FFmpeg-based transcoder.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    /// Creates a new transcoder with the given configuration.
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TranscoderConfig::default())
    }

    /// Asks the process to quit cleanly, waits out the grace period, then
    /// kills it. The child is reaped on every path out of here.
    async fn teardown(&self, child: &mut Child) {
        // ffmpeg treats 'q' on stdin as a clean stop request and finalizes
        // the container before exiting.
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(b"q").await;
            let _ = stdin.shutdown().await;
        }

        let grace = Duration::from_secs(self.config.termination_grace_secs);
        if timeout(grace, child.wait()).await.is_err() {
            debug!("transcode process ignored stop request, killing");
            let _ = child.kill().await;
        }
    }
}

/// Parses the output of `ffmpeg -encoders` into the set of encoder names.
///
/// Encoder lines are indented and look like ` V....D libx265  ...`; the
/// second column is the identifier.
pub fn parse_encoder_list(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter(|line| line.starts_with(' '))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let _flags = parts.next()?;
            let name = parts.next()?;
            (name != "=").then(|| name.to_string())
        })
        .collect()
}

/// Extracts a per-file percentage from one `-progress` line.
///
/// `frame=N` against the expected frame count when the frame rate was
/// probed; otherwise `out_time_ms` (microseconds, despite the name)
/// against the target duration.
fn parse_progress_line(
    line: &str,
    frame_re: Option<&Regex>,
    time_re: Option<&Regex>,
    task: &TranscodeTask,
) -> Option<f32> {
    if let Some(expected) = task.expected_frames {
        let caps = frame_re?.captures(line)?;
        let frame: u64 = caps.get(1)?.as_str().parse().ok()?;
        let percent = frame as f64 / expected.max(1) as f64 * 100.0;
        return Some(percent.clamp(0.0, 100.0) as f32);
    }

    let caps = time_re?.captures(line)?;
    let micros: f64 = caps.get(1)?.as_str().parse().ok()?;
    if task.target_duration_secs <= 0.0 {
        return None;
    }
    let percent = micros / 1_000_000.0 / task.target_duration_secs * 100.0;
    Some(percent.clamp(0.0, 100.0) as f32)
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, path: &Path) -> Result<ProbeInfo, TranscodeError> {
        if !path.exists() {
            return Err(TranscodeError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscodeError::FfprobeNotFound {
                        path: self.config.ffprobe_path.clone(),
                    }
                } else {
                    TranscodeError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(TranscodeError::probe_failed(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_ffprobe_json(&stdout).map_err(TranscodeError::probe_failed)
    }

    async fn available_encoders(&self) -> Result<HashSet<String>, TranscodeError> {
        let output = Command::new(&self.config.ffmpeg_path)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscodeError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    TranscodeError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(TranscodeError::process_failed(
                "ffmpeg -encoders failed",
                Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            ));
        }

        Ok(parse_encoder_list(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn transcode(
        &self,
        task: TranscodeTask,
        progress_tx: mpsc::Sender<f32>,
        cancel: &CancelToken,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        let mut child = Command::new(&self.config.ffmpeg_path)
            .arg("-loglevel")
            .arg(&self.config.ffmpeg_log_level)
            .args(&self.config.extra_ffmpeg_args)
            .args(&task.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscodeError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    TranscodeError::Io(e)
                }
            })?;

        let stdout = child.stdout.take().expect("stdout should be captured");
        let mut lines = BufReader::new(stdout).lines();

        // Drain stderr concurrently so a chatty encoder cannot fill the pipe
        // and stall, keeping only the tail for failure reports.
        let stderr = child.stderr.take();
        let stderr_tail = tokio::spawn(async move {
            let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            }
            tail.into_iter().collect::<Vec<_>>().join("\n")
        });

        let frame_re = Regex::new(r"^frame=\s*(\d+)").ok();
        let time_re = Regex::new(r"^out_time_ms=(\d+)").ok();
        let mut last_sent = -1.0f32;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.teardown(&mut child).await;
                    let _ = stderr_tail.await;
                    return Ok(TranscodeOutcome::Cancelled);
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        let percent =
                            parse_progress_line(&line, frame_re.as_ref(), time_re.as_ref(), &task);
                        if let Some(percent) = percent {
                            if percent > last_sent {
                                last_sent = percent;
                                // A dropped receiver just means nobody is
                                // watching; the transcode carries on.
                                let _ = progress_tx.send(percent).await;
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        let _ = child.kill().await;
                        let _ = stderr_tail.await;
                        return Err(TranscodeError::Io(e));
                    }
                }
            }
        }

        let status = child.wait().await?;
        let tail = stderr_tail.await.unwrap_or_default();

        if !status.success() {
            return Err(TranscodeError::process_failed(
                format!("ffmpeg exited with status {:?}", status.code()),
                (!tail.is_empty()).then_some(tail),
            ));
        }

        Ok(TranscodeOutcome::Finished)
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        for (path, not_found) in [
            (
                &self.config.ffmpeg_path,
                TranscodeError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                },
            ),
            (
                &self.config.ffprobe_path,
                TranscodeError::FfprobeNotFound {
                    path: self.config.ffprobe_path.clone(),
                },
            ),
        ] {
            if let Err(e) = Command::new(path).arg("-version").output().await {
                if e.kind() == std::io::ErrorKind::NotFound {
                    return Err(not_found);
                }
                return Err(TranscodeError::Io(e));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encoder_list() {
        let output = "\
Encoders:
 V..... = Video
 A..... = Audio
 ------
 V....D libx264              H.264 / AVC (codec h264)
 V....D libx265              H.265 / HEVC (codec hevc)
 V....D hevc_nvenc           NVIDIA NVENC hevc encoder (codec hevc)
 A....D aac                  AAC (Advanced Audio Coding)
";
        let encoders = parse_encoder_list(output);
        assert!(encoders.contains("libx265"));
        assert!(encoders.contains("hevc_nvenc"));
        assert!(encoders.contains("aac"));
        assert!(!encoders.contains("="));
        assert!(!encoders.contains("Encoders:"));
    }

    #[test]
    fn test_parse_encoder_list_empty() {
        assert!(parse_encoder_list("").is_empty());
    }

    fn task(expected_frames: Option<u64>, target: f64) -> TranscodeTask {
        TranscodeTask {
            args: vec![],
            expected_frames,
            target_duration_secs: target,
        }
    }

    #[test]
    fn test_progress_from_frame_counter() {
        let frame_re = Regex::new(r"^frame=\s*(\d+)").ok();
        let time_re = Regex::new(r"^out_time_ms=(\d+)").ok();
        let task = task(Some(1000), 40.0);

        let pct = parse_progress_line("frame=250", frame_re.as_ref(), time_re.as_ref(), &task);
        assert_eq!(pct, Some(25.0));

        // Overshoot clamps to 100.
        let pct = parse_progress_line("frame=1500", frame_re.as_ref(), time_re.as_ref(), &task);
        assert_eq!(pct, Some(100.0));

        // Non-progress lines are ignored.
        let pct = parse_progress_line("speed=3.1x", frame_re.as_ref(), time_re.as_ref(), &task);
        assert_eq!(pct, None);
    }

    #[test]
    fn test_progress_timestamp_fallback() {
        let frame_re = Regex::new(r"^frame=\s*(\d+)").ok();
        let time_re = Regex::new(r"^out_time_ms=(\d+)").ok();
        let task = task(None, 100.0);

        // out_time_ms is microseconds: 25 seconds into a 100 second target.
        let pct = parse_progress_line(
            "out_time_ms=25000000",
            frame_re.as_ref(),
            time_re.as_ref(),
            &task,
        );
        assert_eq!(pct, Some(25.0));

        // Frame lines do not drive progress without an expected count.
        let pct = parse_progress_line("frame=500", frame_re.as_ref(), time_re.as_ref(), &task);
        assert_eq!(pct, None);
    }

    #[test]
    fn test_progress_zero_duration_yields_nothing() {
        let frame_re = Regex::new(r"^frame=\s*(\d+)").ok();
        let time_re = Regex::new(r"^out_time_ms=(\d+)").ok();
        let task = task(None, 0.0);
        let pct = parse_progress_line(
            "out_time_ms=1000000",
            frame_re.as_ref(),
            time_re.as_ref(),
            &task,
        );
        assert_eq!(pct, None);
    }
}
