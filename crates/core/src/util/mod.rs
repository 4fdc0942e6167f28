//! Small shared helpers.

pub mod time;

pub use time::{format_hhmmss, parse_hhmmss};
