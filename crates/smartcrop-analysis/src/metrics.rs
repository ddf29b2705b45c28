//! Metrics emitted through the `metrics` facade.
//!
//! The library installs no recorder; without one these calls are no-ops.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const ANALYSES_TOTAL: &str = "smartcrop_analyses_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "smartcrop_analysis_duration_seconds";
    pub const CANDIDATES_SCORED: &str = "smartcrop_candidates_scored";
}

/// Record one finished analysis.
///
/// `outcome` is `"ok"` or the error kind.
pub fn record_analysis(outcome: &'static str, downsampled: bool, duration_secs: f64) {
    let labels = [
        ("outcome", outcome.to_string()),
        ("downsampled", downsampled.to_string()),
    ];

    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record how many candidates one analysis scored.
pub fn record_candidates(count: usize) {
    histogram!(names::CANDIDATES_SCORED).record(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_analysis("ok", true, 0.01);
        record_candidates(42);
    }
}
