//! Call results and run statistics
//!
//! A [`CallResult`] is recorded by a worker for every call that completed
//! with HTTP 200. Nothing else produces one: failed calls become errors.
//! [`RunSummary`] is the single aggregate a run reports, mean throughput
//! over the elapsed wall-clock time.
//!
//! # Example
//!
//! ```
//! use olbench::stats::RunSummary;
//! use std::time::Duration;
//!
//! let summary = RunSummary::new(300, Duration::from_secs(3));
//! assert_eq!(summary.ops_per_sec, 100.0);
//! assert_eq!(summary.to_json().unwrap(), r#"{"seconds":3.0,"ops/s":100.0}"#);
//! ```

pub mod aggregator;

use crate::util::time::calculate_ops_rate;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Status label for recorded results; only successful calls are recorded
pub const SUCCESS_STATUS: &str = "Success";

/// Outcome of one successfully completed call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallResult {
    /// Name of the originating call
    pub name: String,
    /// Wall-clock time the request was issued
    pub start: DateTime<Utc>,
    /// Wall-clock time the response was fully read
    pub end: DateTime<Utc>,
    /// Request duration in seconds (monotonic clock, never negative)
    pub duration: f64,
}

impl CallResult {
    pub fn new(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>, elapsed: Duration) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            duration: elapsed.as_secs_f64(),
        }
    }

    /// One CSV row: `name,status,start,end,duration`
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{:.3}s",
            self.name,
            SUCCESS_STATUS,
            self.start.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.end.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.duration
        )
    }
}

impl fmt::Display for CallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, duration={:.3})", self.name, SUCCESS_STATUS, self.duration)
    }
}

/// Aggregate outcome of a run: `{"seconds": .., "ops/s": ..}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Elapsed wall-clock seconds
    #[serde(serialize_with = "serialize_millis_precision")]
    pub seconds: f64,
    /// Calls per second over the elapsed time
    #[serde(rename = "ops/s", serialize_with = "serialize_millis_precision")]
    pub ops_per_sec: f64,
    /// Number of calls in the workload
    #[serde(skip)]
    pub calls: usize,
}

impl RunSummary {
    pub fn new(calls: usize, elapsed: Duration) -> Self {
        Self {
            seconds: elapsed.as_secs_f64(),
            ops_per_sec: calculate_ops_rate(calls as u64, elapsed),
            calls,
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.seconds)
    }

    /// Compact JSON form written to the run output sink
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Round to three decimals on output
fn serialize_millis_precision<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1000.0).round() / 1000.0)
}
