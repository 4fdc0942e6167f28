//! Encoder backend selection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Target codec family requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecFamily {
    /// H.265 / HEVC
    Hevc,
    /// AV1
    Av1,
}

impl CodecFamily {
    /// The codec name ffprobe reports for streams of this family.
    pub fn codec_name(&self) -> &'static str {
        match self {
            Self::Hevc => "hevc",
            Self::Av1 => "av1",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hevc => "H.265",
            Self::Av1 => "AV1",
        }
    }
}

/// A concrete encoder backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoder {
    /// NVIDIA NVENC HEVC
    HevcNvenc,
    /// Software x265
    X265,
    /// NVIDIA NVENC AV1 (RTX 40 series+)
    Av1Nvenc,
    /// SVT-AV1
    SvtAv1,
    /// libaom AV1 reference encoder, slow but always present
    AomAv1,
}

impl Encoder {
    /// The ffmpeg encoder identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HevcNvenc => "hevc_nvenc",
            Self::X265 => "libx265",
            Self::Av1Nvenc => "av1_nvenc",
            Self::SvtAv1 => "libsvtav1",
            Self::AomAv1 => "libaom-av1",
        }
    }

    /// Whether this backend offloads to dedicated hardware.
    pub fn is_hardware(&self) -> bool {
        matches!(self, Self::HevcNvenc | Self::Av1Nvenc)
    }
}

/// A resolved encoder, valid only for the family it was selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderChoice {
    pub encoder: Encoder,
    pub family: CodecFamily,
}

impl EncoderChoice {
    pub fn is_hardware(&self) -> bool {
        self.encoder.is_hardware()
    }
}

/// Picks the best available encoder for `family`.
///
/// Hardware first, then the software fallback chain. The final fallback of
/// each chain is assumed present, so selection is total; an empty
/// `available` set (enumeration failed) lands on it.
pub fn select_encoder(family: CodecFamily, available: &HashSet<String>) -> EncoderChoice {
    let has = |e: Encoder| available.contains(e.name());

    let encoder = match family {
        CodecFamily::Hevc => {
            if has(Encoder::HevcNvenc) {
                Encoder::HevcNvenc
            } else {
                Encoder::X265
            }
        }
        CodecFamily::Av1 => {
            if has(Encoder::Av1Nvenc) {
                Encoder::Av1Nvenc
            } else if has(Encoder::SvtAv1) {
                Encoder::SvtAv1
            } else {
                Encoder::AomAv1
            }
        }
    };

    EncoderChoice { encoder, family }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hevc_prefers_nvenc() {
        let choice = select_encoder(CodecFamily::Hevc, &set(&["libx265", "hevc_nvenc"]));
        assert_eq!(choice.encoder, Encoder::HevcNvenc);
        assert!(choice.is_hardware());
    }

    #[test]
    fn test_hevc_falls_back_to_x265() {
        let choice = select_encoder(CodecFamily::Hevc, &set(&["libx264", "libaom-av1"]));
        assert_eq!(choice.encoder, Encoder::X265);
        assert!(!choice.is_hardware());
    }

    #[test]
    fn test_av1_fallback_chain() {
        let all = set(&["av1_nvenc", "libsvtav1", "libaom-av1"]);
        assert_eq!(select_encoder(CodecFamily::Av1, &all).encoder, Encoder::Av1Nvenc);

        let no_hw = set(&["libsvtav1", "libaom-av1"]);
        assert_eq!(select_encoder(CodecFamily::Av1, &no_hw).encoder, Encoder::SvtAv1);

        let aom_only = set(&["libaom-av1"]);
        assert_eq!(select_encoder(CodecFamily::Av1, &aom_only).encoder, Encoder::AomAv1);
    }

    #[test]
    fn test_empty_set_selects_final_fallback() {
        let empty = HashSet::new();
        assert_eq!(select_encoder(CodecFamily::Hevc, &empty).encoder, Encoder::X265);
        assert_eq!(select_encoder(CodecFamily::Av1, &empty).encoder, Encoder::AomAv1);
    }

    #[test]
    fn test_choice_keeps_family() {
        let choice = select_encoder(CodecFamily::Av1, &HashSet::new());
        assert_eq!(choice.family, CodecFamily::Av1);
        assert_eq!(choice.family.codec_name(), "av1");
    }
}
