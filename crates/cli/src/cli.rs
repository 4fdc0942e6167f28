//! CLI argument surface.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};

use batchpress_core::command::{AudioCodec, AudioPolicy, Container, CropRange};
use batchpress_core::encoder::{CodecFamily, Preset, RateRequest};
use batchpress_core::runner::{BatchRequest, BatchSettings};
use batchpress_core::util::parse_hhmmss;

#[derive(Parser, Debug)]
#[command(
    name = "batchpress",
    version,
    about = "Batch-transcode videos with ffmpeg, with whole-batch progress and cancellation"
)]
pub struct Args {
    /// Video files to transcode, processed in order
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Target video codec
    #[arg(long, value_enum, default_value_t = CodecArg::H265)]
    pub codec: CodecArg,

    /// Output container
    #[arg(long, value_enum, default_value_t = ContainerArg::Mp4)]
    pub container: ContainerArg,

    /// Speed/quality preset (ultrafast..veryslow); unknown names fall back to medium
    #[arg(long, default_value = "medium")]
    pub preset: String,

    /// Target video bitrate in kbps
    #[arg(long, conflicts_with = "quality")]
    pub bitrate: Option<i64>,

    /// Constant-quality value (CRF/CQ) instead of a bitrate
    #[arg(long)]
    pub quality: Option<i64>,

    /// Re-encode audio to this codec instead of copying it
    #[arg(long, value_enum)]
    pub audio_codec: Option<AudioCodecArg>,

    /// Audio bitrate in kbps when re-encoding
    #[arg(long, default_value_t = 160)]
    pub audio_bitrate: u32,

    /// Disable automatic stream copy when the source codec already matches
    #[arg(long)]
    pub no_smart_copy: bool,

    /// Write outputs here instead of next to each input
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Trim a file before converting: PATH=START-END (HH:MM:SS, MM:SS or SS)
    #[arg(long = "crop", value_name = "PATH=START-END")]
    pub crops: Vec<String>,

    /// Config file path (default: batchpress.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodecArg {
    Av1,
    #[value(name = "h265", alias = "hevc")]
    H265,
}

impl From<CodecArg> for CodecFamily {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::Av1 => Self::Av1,
            CodecArg::H265 => Self::Hevc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContainerArg {
    Mp4,
    Mkv,
}

impl From<ContainerArg> for Container {
    fn from(arg: ContainerArg) -> Self {
        match arg {
            ContainerArg::Mp4 => Self::Mp4,
            ContainerArg::Mkv => Self::Mkv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudioCodecArg {
    Aac,
    Opus,
}

impl From<AudioCodecArg> for AudioCodec {
    fn from(arg: AudioCodecArg) -> Self {
        match arg {
            AudioCodecArg::Aac => Self::Aac,
            AudioCodecArg::Opus => Self::Opus,
        }
    }
}

impl Args {
    /// The rate-control request; bitrate 2000 kbps unless overridden.
    pub fn rate_request(&self) -> RateRequest {
        match self.quality {
            Some(q) => RateRequest::Quality(q),
            None => RateRequest::Bitrate(self.bitrate.unwrap_or(2000)),
        }
    }

    /// Converts the parsed arguments into a batch request.
    pub fn to_batch_request(&self) -> Result<BatchRequest> {
        let mut crops = HashMap::new();
        for spec in &self.crops {
            let (path, range) = parse_crop_spec(spec).map_err(|e| anyhow!("--crop {spec}: {e}"))?;
            crops.insert(path, range);
        }

        let audio = match self.audio_codec {
            None => AudioPolicy::Copy,
            Some(codec) => AudioPolicy::Encode {
                codec: codec.into(),
                bitrate_kbps: self.audio_bitrate,
            },
        };

        Ok(BatchRequest {
            files: self.files.clone(),
            settings: BatchSettings {
                codec: self.codec.into(),
                container: self.container.into(),
                preset: Preset::from_str_lossy(&self.preset),
                rate: self.rate_request(),
                audio,
                smart_copy: !self.no_smart_copy,
                output_dir: self.output_dir.clone(),
                crops,
            },
        })
    }
}

/// Parses a `PATH=START-END` crop specification.
pub fn parse_crop_spec(spec: &str) -> Result<(PathBuf, CropRange), String> {
    let (path, range) = spec
        .rsplit_once('=')
        .ok_or_else(|| "expected PATH=START-END".to_string())?;
    let (start_str, end_str) = range
        .split_once('-')
        .ok_or_else(|| "expected START-END after '='".to_string())?;

    let start = parse_hhmmss(start_str).ok_or_else(|| format!("invalid start time: {start_str}"))?;
    let end = parse_hhmmss(end_str).ok_or_else(|| format!("invalid end time: {end_str}"))?;
    if end <= start {
        return Err("end must be after start".to_string());
    }

    Ok((PathBuf::from(path), CropRange { start, end }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crop_spec_forms() {
        let (path, crop) = parse_crop_spec("/media/a.mkv=00:01:00-00:02:30").unwrap();
        assert_eq!(path, PathBuf::from("/media/a.mkv"));
        assert_eq!(crop, CropRange { start: 60, end: 150 });

        let (_, crop) = parse_crop_spec("clip.mp4=30-90").unwrap();
        assert_eq!(crop, CropRange { start: 30, end: 90 });
    }

    #[test]
    fn test_parse_crop_spec_rejects_bad_input() {
        assert!(parse_crop_spec("no-separator").is_err());
        assert!(parse_crop_spec("a.mkv=10").is_err());
        assert!(parse_crop_spec("a.mkv=90-30").is_err());
        assert!(parse_crop_spec("a.mkv=x-y").is_err());
    }

    #[test]
    fn test_defaults_build_bitrate_request() {
        let args = Args::try_parse_from(["batchpress", "a.mkv"]).unwrap();
        let request = args.to_batch_request().unwrap();
        assert_eq!(request.settings.rate, RateRequest::Bitrate(2000));
        assert_eq!(request.settings.codec, CodecFamily::Hevc);
        assert_eq!(request.settings.container, Container::Mp4);
        assert!(request.settings.smart_copy);
        assert!(matches!(request.settings.audio, AudioPolicy::Copy));
    }

    #[test]
    fn test_quality_mode_and_flags() {
        let args = Args::try_parse_from([
            "batchpress",
            "--codec",
            "av1",
            "--quality",
            "30",
            "--audio-codec",
            "opus",
            "--no-smart-copy",
            "a.mkv",
            "b.mkv",
        ])
        .unwrap();
        let request = args.to_batch_request().unwrap();
        assert_eq!(request.files.len(), 2);
        assert_eq!(request.settings.codec, CodecFamily::Av1);
        assert_eq!(request.settings.rate, RateRequest::Quality(30));
        assert!(!request.settings.smart_copy);
        assert!(matches!(
            request.settings.audio,
            AudioPolicy::Encode {
                codec: AudioCodec::Opus,
                bitrate_kbps: 160
            }
        ));
    }

    #[test]
    fn test_bitrate_conflicts_with_quality() {
        let result =
            Args::try_parse_from(["batchpress", "--bitrate", "2000", "--quality", "23", "a.mkv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_preset_degrades_to_medium() {
        let args = Args::try_parse_from(["batchpress", "--preset", "turbo", "a.mkv"]).unwrap();
        let request = args.to_batch_request().unwrap();
        assert_eq!(request.settings.preset, Preset::Medium);
    }

    #[test]
    fn test_crop_args_collected() {
        let args = Args::try_parse_from([
            "batchpress",
            "--crop",
            "a.mkv=10-20",
            "--crop",
            "b.mkv=00:30-01:30",
            "a.mkv",
            "b.mkv",
        ])
        .unwrap();
        let request = args.to_batch_request().unwrap();
        assert_eq!(request.settings.crops.len(), 2);
        assert_eq!(
            request.settings.crops[&PathBuf::from("b.mkv")],
            CropRange { start: 30, end: 90 }
        );
    }
}
