//! Speed/quality preset mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::selector::Encoder;

/// Abstract speed/quality preset, ordered fastest to slowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl Preset {
    /// All presets, fastest first.
    pub const ALL: [Preset; 9] = [
        Preset::Ultrafast,
        Preset::Superfast,
        Preset::Veryfast,
        Preset::Faster,
        Preset::Fast,
        Preset::Medium,
        Preset::Slow,
        Preset::Slower,
        Preset::Veryslow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ultrafast => "ultrafast",
            Self::Superfast => "superfast",
            Self::Veryfast => "veryfast",
            Self::Faster => "faster",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::Slower => "slower",
            Self::Veryslow => "veryslow",
        }
    }

    /// Parses a preset name, falling back to `Medium` for anything unknown.
    pub fn from_str_lossy(name: &str) -> Self {
        name.parse().unwrap_or(Self::Medium)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown preset: {s}"))
    }
}

/// Maps an abstract preset onto the encoder's native preset token.
///
/// NVENC knows p1 (fastest) through p7 (slowest); the three slowest abstract
/// levels all land on p7. SVT-AV1 uses a numeric scale where lower means
/// slower/better. The remaining software encoders take the abstract name
/// unchanged.
pub fn map_preset(encoder: Encoder, preset: Preset) -> &'static str {
    match encoder {
        Encoder::HevcNvenc | Encoder::Av1Nvenc => match preset {
            Preset::Ultrafast => "p1",
            Preset::Superfast => "p2",
            Preset::Veryfast => "p3",
            Preset::Faster => "p4",
            Preset::Fast => "p5",
            Preset::Medium => "p6",
            Preset::Slow | Preset::Slower | Preset::Veryslow => "p7",
        },
        Encoder::SvtAv1 => match preset {
            Preset::Ultrafast => "13",
            Preset::Superfast => "12",
            Preset::Veryfast => "10",
            Preset::Faster => "9",
            Preset::Fast => "8",
            Preset::Medium => "6",
            Preset::Slow => "4",
            Preset::Slower => "3",
            Preset::Veryslow => "2",
        },
        Encoder::X265 | Encoder::AomAv1 => preset.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!("ultrafast".parse::<Preset>().unwrap(), Preset::Ultrafast);
        assert_eq!("VerySlow".parse::<Preset>().unwrap(), Preset::Veryslow);
        assert!(" fast ".parse::<Preset>().is_ok());
    }

    #[test]
    fn test_unknown_name_falls_back_to_medium() {
        assert!("turbo".parse::<Preset>().is_err());
        assert_eq!(Preset::from_str_lossy("turbo"), Preset::Medium);
        assert_eq!(Preset::from_str_lossy(""), Preset::Medium);
    }

    #[test]
    fn test_nvenc_mapping_is_monotone() {
        let tokens: Vec<u8> = Preset::ALL
            .iter()
            .map(|p| {
                map_preset(Encoder::HevcNvenc, *p)
                    .trim_start_matches('p')
                    .parse()
                    .unwrap()
            })
            .collect();
        assert!(tokens.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(map_preset(Encoder::Av1Nvenc, Preset::Ultrafast), "p1");
        assert_eq!(map_preset(Encoder::Av1Nvenc, Preset::Veryslow), "p7");
    }

    #[test]
    fn test_nvenc_collapses_slow_tail() {
        assert_eq!(map_preset(Encoder::HevcNvenc, Preset::Slow), "p7");
        assert_eq!(map_preset(Encoder::HevcNvenc, Preset::Slower), "p7");
        assert_eq!(map_preset(Encoder::HevcNvenc, Preset::Veryslow), "p7");
    }

    #[test]
    fn test_svt_mapping_is_monotone_decreasing() {
        // SVT-AV1: lower number = slower, so faster presets map to higher numbers.
        let values: Vec<u8> = Preset::ALL
            .iter()
            .map(|p| map_preset(Encoder::SvtAv1, *p).parse().unwrap())
            .collect();
        assert!(values.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(map_preset(Encoder::SvtAv1, Preset::Medium), "6");
    }

    #[test]
    fn test_software_passthrough() {
        for preset in Preset::ALL {
            assert_eq!(map_preset(Encoder::X265, preset), preset.as_str());
            assert_eq!(map_preset(Encoder::AomAv1, preset), preset.as_str());
        }
    }
}
