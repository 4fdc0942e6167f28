//! Encoder selection, preset mapping and rate control.
//!
//! Everything in this module is a pure function over enumerated types so the
//! whole policy surface is unit-testable without touching a process.

mod preset;
mod rate;
mod selector;

pub use preset::{map_preset, Preset};
pub use rate::{
    rate_flags, resolve_rate, RateControl, RateRequest, ResolvedRate, BITRATE_MAX_KBPS,
    BITRATE_MIN_KBPS, QUALITY_MAX_AV1, QUALITY_MAX_HEVC, QUALITY_MIN,
};
pub use selector::{select_encoder, CodecFamily, Encoder, EncoderChoice};
