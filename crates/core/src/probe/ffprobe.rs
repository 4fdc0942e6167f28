//! Parsing of ffprobe JSON output.

use serde::Deserialize;

use super::types::ProbeInfo;

/// Parses the JSON document produced by
/// `ffprobe -print_format json -show_format -show_streams`.
///
/// Individual missing or malformed fields degrade to zero/absent; only a
/// document that is not valid JSON at all is an error.
pub fn parse_ffprobe_json(output: &str) -> Result<ProbeInfo, String> {
    #[derive(Deserialize)]
    struct ProbeDoc {
        #[serde(default)]
        format: ProbeFormat,
        #[serde(default)]
        streams: Vec<ProbeStream>,
    }

    #[derive(Deserialize, Default)]
    struct ProbeFormat {
        duration: Option<String>,
    }

    #[derive(Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        codec_name: Option<String>,
        bit_rate: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }

    let doc: ProbeDoc = serde_json::from_str(output)
        .map_err(|e| format!("invalid ffprobe output: {e}"))?;

    let duration_secs = doc
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .unwrap_or(0.0);

    let video = doc
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let audio = doc
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(ProbeInfo {
        duration_secs,
        video_codec: video.and_then(|s| s.codec_name.clone()),
        audio_codec: audio.and_then(|s| s.codec_name.clone()),
        audio_bitrate_kbps: audio
            .and_then(|s| s.bit_rate.as_deref())
            .and_then(|b| b.parse::<f64>().ok())
            .map(|b| b / 1000.0),
        video_width: video.and_then(|s| s.width),
        video_height: video.and_then(|s| s.height),
        video_fps: video
            .and_then(|s| s.r_frame_rate.as_deref())
            .and_then(parse_frame_rate),
    })
}

/// Parses frame rates like `24000/1001` or `30/1`.
fn parse_frame_rate(raw: &str) -> Option<f32> {
    match raw.split_once('/') {
        Some((num, den)) => {
            let num = num.parse::<f32>().ok()?;
            let den = den.parse::<f32>().ok()?;
            if den > 0.0 {
                Some(num / den)
            } else {
                None
            }
        }
        None => raw.parse::<f32>().ok(),
    }
}
