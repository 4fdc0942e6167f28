//! Transcode command construction.

mod builder;
mod output;
mod types;

pub use builder::build_args;
pub use output::resolve_output_path;
pub use types::{AudioCodec, AudioPolicy, Container, CropRange, Job};
