//! Human-readable run summary
//!
//! Logged rather than printed: stdout is reserved for the JSON summary.

use crate::coordinator::RunReport;
use crate::util::time::{format_duration, format_rate};

/// One-line description of a run
pub fn summary_line(report: &RunReport) -> String {
    let summary = &report.summary;
    format!(
        "{} calls in {} ({} ops/s) across {} workers",
        summary.calls,
        format_duration(summary.elapsed()),
        format_rate(summary.ops_per_sec),
        report.per_worker.len()
    )
}

/// Log the run results
pub fn log_results(report: &RunReport) {
    tracing::info!("{}", summary_line(report));
    for (worker_id, completed) in &report.per_worker {
        tracing::debug!(worker_id, completed, "Worker results");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::RunSummary;
    use std::time::Duration;

    #[test]
    fn test_summary_line() {
        let report = RunReport {
            results: Vec::new(),
            summary: RunSummary::new(3000, Duration::from_millis(1500)),
            per_worker: vec![(0, 1500), (1, 1500)],
        };
        assert_eq!(
            summary_line(&report),
            "3000 calls in 1.50s (2.00K ops/s) across 2 workers"
        );
    }
}
