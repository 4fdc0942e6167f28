//! Whole-batch progress aggregation.

/// Folds per-file progress fractions into a monotone whole-batch
/// percentage, weighted by each file's target duration.
///
/// The denominator is fixed at construction and floored to one second so a
/// degenerate batch (all probes failed) cannot divide by zero. Values are
/// only handed out when the rounded integer changes, which keeps event
/// traffic bounded under rapid per-file updates.
#[derive(Debug)]
pub struct ProgressAggregator {
    total_secs: f64,
    completed_secs: f64,
    last_emitted: Option<u8>,
}

impl ProgressAggregator {
    pub fn new(total_target_secs: f64) -> Self {
        Self {
            total_secs: total_target_secs.max(1.0),
            completed_secs: 0.0,
            last_emitted: None,
        }
    }

    fn overall(&self, in_file_secs: f64) -> u8 {
        let percent = (self.completed_secs + in_file_secs) / self.total_secs * 100.0;
        percent.clamp(0.0, 100.0).round() as u8
    }

    /// Feeds one per-file progress sample (0-100) for the file currently
    /// running, with that file's target duration. Returns the new overall
    /// percentage when it increased, `None` otherwise.
    pub fn file_progress(&mut self, file_percent: f32, file_target_secs: f64) -> Option<u8> {
        let in_file = f64::from(file_percent.clamp(0.0, 100.0)) / 100.0 * file_target_secs;
        let overall = self.overall(in_file);
        if self.last_emitted.is_none_or(|last| overall > last) {
            self.last_emitted = Some(overall);
            Some(overall)
        } else {
            None
        }
    }

    /// Marks the current file complete, crediting its full target duration.
    /// Always returns a fresh overall value so the aggregate cannot end a
    /// file below its true share even if the last sample undershot.
    pub fn complete_file(&mut self, file_target_secs: f64) -> u8 {
        self.completed_secs += file_target_secs;
        let overall = self.overall(0.0).max(self.last_emitted.unwrap_or(0));
        self.last_emitted = Some(overall);
        overall
    }
}
