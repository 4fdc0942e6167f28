//! Output path naming and collision avoidance.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::types::Container;

/// Computes the output path for `input`: `<stem>_converted.<ext>` in the
/// input's directory, or `output_dir` when given.
///
/// If the base name already exists on disk a unix-timestamp suffix is
/// inserted before the extension so a repeated run never overwrites a
/// previous result. The existence check happens here, at command-build
/// time, not earlier.
pub fn resolve_output_path(input: &Path, output_dir: Option<&Path>, container: Container) -> PathBuf {
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let ext = container.extension();

    let candidate = dir.join(format!("{stem}_converted.{ext}"));
    if !candidate.exists() {
        return candidate;
    }

    dir.join(format!("{stem}_converted_{}.{ext}", Utc::now().timestamp()))
}
