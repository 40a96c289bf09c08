//! Result aggregation
//!
//! Merges the result buffers handed back by workers into one list. The merged
//! order is by worker index, then by each worker's own completion order. It is
//! NOT the workload order: workers pull from a shared queue, so which worker
//! ran which call is not fixed. With a single worker the two orders coincide.
//!
//! # Example
//!
//! ```
//! use olbench::stats::{CallResult, aggregator::ResultAggregator};
//! use chrono::Utc;
//! use std::time::Duration;
//!
//! let now = Utc::now();
//! let mut aggregator = ResultAggregator::new();
//! aggregator.add_worker(1, vec![CallResult::new("b", now, now, Duration::ZERO)]);
//! aggregator.add_worker(0, vec![CallResult::new("a", now, now, Duration::ZERO)]);
//!
//! let names: Vec<String> = aggregator.into_results().into_iter().map(|r| r.name).collect();
//! assert_eq!(names, vec!["a", "b"]);
//! ```

use super::CallResult;
use std::collections::BTreeMap;

/// Collects per-worker result batches
///
/// Batches are keyed by worker index so the merged view is in worker index
/// order regardless of the order batches arrive in.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    /// worker_id → that worker's results, in its completion order
    workers: BTreeMap<usize, Vec<CallResult>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the result batch of a worker
    ///
    /// A worker reports exactly once; a second batch for the same index
    /// replaces the first.
    pub fn add_worker(&mut self, worker_id: usize, results: Vec<CallResult>) {
        self.workers.insert(worker_id, results);
    }

    /// Number of workers that reported
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Total results across all workers
    pub fn total_results(&self) -> usize {
        self.workers.values().map(Vec::len).sum()
    }

    /// Results of one worker
    pub fn worker_results(&self, worker_id: usize) -> Option<&[CallResult]> {
        self.workers.get(&worker_id).map(Vec::as_slice)
    }

    /// Result count per worker, in worker index order
    pub fn per_worker_counts(&self) -> Vec<(usize, usize)> {
        self.workers.iter().map(|(id, results)| (*id, results.len())).collect()
    }

    /// Merge all batches: worker index order, then completion order
    pub fn into_results(self) -> Vec<CallResult> {
        let mut merged = Vec::with_capacity(self.total_results());
        for (_, results) in self.workers {
            merged.extend(results);
        }
        merged
    }
}
