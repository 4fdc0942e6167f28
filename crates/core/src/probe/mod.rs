//! Media probing: duration/codec extraction with a per-batch cache.
//!
//! Probing never fails past this module. A file that cannot be probed is
//! represented by [`ProbeInfo::sentinel`] (zero duration, no codec data) so
//! a broken input degrades to a skipped-progress file instead of aborting
//! the batch.

mod ffprobe;
mod prober;
mod types;

pub use ffprobe::parse_ffprobe_json;
pub use prober::MediaProber;
pub use types::ProbeInfo;
