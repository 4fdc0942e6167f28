//! Rate-control resolution and flag synthesis.

use serde::{Deserialize, Serialize};

use super::selector::{CodecFamily, Encoder};

/// Practical floor; below this output is usually unwatchable.
pub const BITRATE_MIN_KBPS: u32 = 50;
/// 200 Mbps ceiling.
pub const BITRATE_MAX_KBPS: u32 = 200_000;

/// Lower quality values mean better quality and larger files.
pub const QUALITY_MIN: u32 = 0;
/// x265 / NVENC HEVC maximum.
pub const QUALITY_MAX_HEVC: u32 = 51;
/// libaom / SVT-AV1 maximum.
pub const QUALITY_MAX_AV1: u32 = 63;

/// A raw, not yet validated rate-control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum RateRequest {
    /// Target bitrate in kbps.
    Bitrate(i64),
    /// Constant-quality value (CRF/CQ).
    Quality(i64),
}

/// A validated rate-control setting, within bounds for its codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum RateControl {
    Bitrate(u32),
    Quality(u32),
}

impl RateControl {
    /// The applied numeric value, whatever the mode.
    pub fn value(&self) -> u32 {
        match self {
            Self::Bitrate(v) | Self::Quality(v) => *v,
        }
    }
}

/// Outcome of rate resolution. `clamped_from` carries the original value
/// when clamping changed it, so the caller can surface the adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRate {
    pub control: RateControl,
    pub clamped_from: Option<i64>,
}

/// Validates and clamps a rate request against codec-dependent bounds.
///
/// Values are clamped, never rejected; a clamp is reported through
/// `clamped_from` rather than silently applied.
pub fn resolve_rate(request: RateRequest, family: CodecFamily) -> ResolvedRate {
    let (raw, lo, hi) = match request {
        RateRequest::Bitrate(v) => (v, BITRATE_MIN_KBPS, BITRATE_MAX_KBPS),
        RateRequest::Quality(v) => {
            let hi = match family {
                CodecFamily::Hevc => QUALITY_MAX_HEVC,
                CodecFamily::Av1 => QUALITY_MAX_AV1,
            };
            (v, QUALITY_MIN, hi)
        }
    };

    let clamped = raw.clamp(i64::from(lo), i64::from(hi)) as u32;
    let control = match request {
        RateRequest::Bitrate(_) => RateControl::Bitrate(clamped),
        RateRequest::Quality(_) => RateControl::Quality(clamped),
    };

    ResolvedRate {
        control,
        clamped_from: (i64::from(clamped) != raw).then_some(raw),
    }
}

/// Derives the encoder-specific rate-control flags.
pub fn rate_flags(encoder: Encoder, control: RateControl) -> Vec<String> {
    match control {
        RateControl::Bitrate(kbps) => {
            let b = format!("{kbps}k");
            if encoder.is_hardware() {
                // VBR with target bitrate and a buffer sized to 2x target.
                vec![
                    "-rc:v".into(),
                    "vbr".into(),
                    "-b:v".into(),
                    b.clone(),
                    "-maxrate".into(),
                    b,
                    "-bufsize".into(),
                    format!("{}k", kbps * 2),
                ]
            } else {
                vec!["-b:v".into(), b]
            }
        }
        RateControl::Quality(q) => {
            if encoder.is_hardware() {
                vec!["-rc:v".into(), "vbr".into(), "-cq:v".into(), q.to_string()]
            } else if encoder == Encoder::SvtAv1 {
                // SVT-AV1 needs the explicit zero bitrate to honor CRF mode.
                vec!["-crf".into(), q.to_string(), "-b:v".into(), "0".into()]
            } else {
                vec!["-crf".into(), q.to_string()]
            }
        }
    }
}
