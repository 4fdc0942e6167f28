//! Rough output-size and wall-clock estimates, shown before a batch starts.

use crate::encoder::{CodecFamily, Preset};

/// Audio bitrate assumed when the probe reported none, in kbps.
const DEFAULT_AUDIO_BITRATE_KBPS: f64 = 128.0;

/// Container muxing overhead applied on top of the raw payload.
const MUX_OVERHEAD: f64 = 1.1;

/// Relative encode-speed factor of a preset (medium = 1.5).
pub fn preset_time_factor(preset: Preset) -> f64 {
    match preset {
        Preset::Ultrafast => 0.5,
        Preset::Superfast => 0.7,
        Preset::Veryfast => 0.8,
        Preset::Faster => 1.0,
        Preset::Fast => 1.2,
        Preset::Medium => 1.5,
        Preset::Slow => 2.5,
        Preset::Slower => 4.0,
        Preset::Veryslow => 8.0,
    }
}

/// Estimated output size in MB for one file under bitrate rate control.
///
/// Only meaningful in bitrate mode; under CRF/CQ the size depends on the
/// content and no estimate is offered.
pub fn estimated_size_mb(
    video_bitrate_kbps: u32,
    target_secs: f64,
    audio_bitrate_kbps: Option<f64>,
) -> f64 {
    let audio = audio_bitrate_kbps.unwrap_or(DEFAULT_AUDIO_BITRATE_KBPS);
    let payload_kb = (f64::from(video_bitrate_kbps) + audio) * target_secs;
    payload_kb / 8192.0 * MUX_OVERHEAD
}

/// Very rough wall-clock estimate in seconds for encoding one file.
pub fn estimated_time_secs(
    target_secs: f64,
    preset: Preset,
    codec: CodecFamily,
    hardware: bool,
) -> f64 {
    let codec_factor = match codec {
        CodecFamily::Av1 => 1.5,
        CodecFamily::Hevc => 1.0,
    };
    let hardware_factor = if hardware { 0.33 } else { 1.0 };
    target_secs * preset_time_factor(preset) * codec_factor * hardware_factor
}
