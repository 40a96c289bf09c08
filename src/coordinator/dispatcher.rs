//! Benchmark dispatcher
//!
//! The dispatcher runs one workload through a freshly started
//! [`WorkerPool`]:
//!
//! 1. Start every worker (the pool size never changes during a run)
//! 2. Enqueue calls strictly in workload order, aborting on the first
//!    signalled error; the remaining calls are never sent
//! 3. Close the queue and wait for every worker's terminal state
//! 4. Merge the result buffers by worker index and compute throughput
//!
//! Elapsed time runs from just before the first enqueue until every worker
//! has finished, so it covers execution and not only submission.

use super::pool::WorkerPool;
use crate::config::{Call, RunConfig, DEFAULT_QUEUE_CAPACITY};
use crate::error::BenchResult;
use crate::stats::aggregator::ResultAggregator;
use crate::stats::{CallResult, RunSummary};
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Instant;
use tracing::Span;

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// All results, by worker index then per-worker completion order
    pub results: Vec<CallResult>,
    /// Elapsed time and throughput
    pub summary: RunSummary,
    /// (worker_id, completed calls) in worker index order
    pub per_worker: Vec<(usize, usize)>,
}

/// Owns the pool configuration and runs workloads
pub struct Dispatcher {
    tasks: usize,
    queue_capacity: usize,
    transport: Arc<dyn Transport>,
    logger: Span,
}

impl Dispatcher {
    /// Create a dispatcher running `tasks` workers against `transport`
    ///
    /// `logger` is the run-scoped logger; all dispatcher and worker events
    /// are recorded under it.
    pub fn new(tasks: usize, transport: Arc<dyn Transport>, logger: Span) -> Self {
        Self {
            tasks,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            transport,
            logger,
        }
    }

    /// Create a dispatcher from a validated run configuration
    pub fn from_config(config: &RunConfig, transport: Arc<dyn Transport>, logger: Span) -> Self {
        Self::new(config.tasks, transport, logger).with_queue_capacity(config.queue_capacity)
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn tasks(&self) -> usize {
        self.tasks
    }

    /// Run every call once. Any worker error aborts the run and no report is
    /// produced.
    pub fn run(&self, calls: Vec<Call>) -> BenchResult<RunReport> {
        let _entered = self.logger.enter();
        let total_calls = calls.len();

        let mut pool = WorkerPool::start(
            self.tasks,
            self.queue_capacity,
            Arc::clone(&self.transport),
            &self.logger,
        )?;
        tracing::debug!(workers = pool.size(), calls = total_calls, "Start workload");

        let t0 = Instant::now();
        for call in calls {
            if let Err(err) = pool.submit(call) {
                tracing::error!(
                    submitted = pool.submitted(),
                    total = total_calls,
                    error = %err,
                    "Aborting run"
                );
                pool.abort();
                return Err(err);
            }
        }
        tracing::debug!("Finished sending requests");

        let batches = pool.finish()?;
        let elapsed = t0.elapsed();

        let mut aggregator = ResultAggregator::new();
        for (worker_id, batch) in batches.into_iter().enumerate() {
            aggregator.add_worker(worker_id, batch);
        }
        let per_worker = aggregator.per_worker_counts();
        let results = aggregator.into_results();
        for result in &results {
            tracing::debug!("{}", result);
        }

        Ok(RunReport {
            results,
            summary: RunSummary::new(total_calls, elapsed),
            per_worker,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::pool::worker_thread_name;
    use crate::error::BenchError;
    use crate::transport::mock::{MockFailure, MockTransport};
    use std::time::Duration;

    fn dispatcher(tasks: usize, transport: &MockTransport) -> Dispatcher {
        Dispatcher::new(tasks, Arc::new(transport.clone()), Span::none())
    }

    fn calls(names: &[&str]) -> Vec<Call> {
        names.iter().map(|n| Call::new(*n)).collect()
    }

    fn numbered(k: usize) -> Vec<Call> {
        (0..k).map(|i| Call::new(format!("fn{}", i))).collect()
    }

    #[test]
    fn test_single_worker_preserves_order_and_timing() {
        let transport = MockTransport::with_latency(Duration::from_millis(10));
        let report = dispatcher(1, &transport).run(calls(&["a", "b", "c"])).unwrap();

        let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let summary = report.summary;
        assert_eq!(summary.calls, 3);
        assert!(summary.seconds >= 0.03, "seconds = {}", summary.seconds);
        assert!(summary.seconds < 1.0, "seconds = {}", summary.seconds);
        assert!(summary.ops_per_sec <= 100.0 && summary.ops_per_sec > 3.0);
        assert_eq!(report.per_worker, vec![(0, 3)]);
    }

    #[test]
    fn test_all_calls_succeed_with_many_workers() {
        let transport = MockTransport::with_latency(Duration::from_millis(1));
        let k = 40;
        let report = dispatcher(4, &transport).run(numbered(k)).unwrap();

        assert_eq!(report.results.len(), k);
        assert!(report.summary.seconds > 0.0);
        assert!((report.summary.ops_per_sec - k as f64 / report.summary.seconds).abs() < 1e-6);
        assert_eq!(report.per_worker.len(), 4);
        assert_eq!(report.per_worker.iter().map(|(_, n)| n).sum::<usize>(), k);
    }

    #[test]
    fn test_results_grouped_by_worker_index() {
        let transport = MockTransport::with_latency(Duration::from_millis(2));
        let report = dispatcher(3, &transport).run(numbered(24)).unwrap();

        let mut offset = 0;
        for (worker_id, count) in &report.per_worker {
            let expected = transport.calls_from_thread(&worker_thread_name(*worker_id));
            let actual: Vec<String> = report.results[offset..offset + count]
                .iter()
                .map(|r| r.name.clone())
                .collect();
            assert_eq!(actual, expected);
            offset += count;
        }
        assert_eq!(offset, 24);
    }

    #[test]
    fn test_more_workers_than_calls() {
        let transport = MockTransport::new();
        let report = dispatcher(8, &transport).run(numbered(3)).unwrap();
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.per_worker.len(), 8);
    }

    #[test]
    fn test_empty_workload() {
        let transport = MockTransport::new();
        let report = dispatcher(2, &transport).run(Vec::new()).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.summary.ops_per_sec, 0.0);
    }

    #[test]
    fn test_unexpected_status_aborts_run() {
        let transport = MockTransport::with_latency(Duration::from_millis(10));
        transport.fail_call("b", MockFailure::Status(500));

        let result = dispatcher(2, &transport).run(calls(&["a", "b"]));
        assert!(matches!(
            result,
            Err(BenchError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[test]
    fn test_transport_error_aborts_before_remaining_calls() {
        let transport = MockTransport::new();
        transport.fail_call("fn0", MockFailure::Transport);

        let result = dispatcher(1, &transport).with_queue_capacity(1).run(numbered(200));
        assert!(matches!(result, Err(BenchError::Transport { .. })));
        assert_eq!(transport.invocation_count(), 1);
    }

    #[test]
    fn test_zero_tasks_is_an_error() {
        let transport = MockTransport::new();
        assert!(matches!(
            dispatcher(0, &transport).run(numbered(1)),
            Err(BenchError::EmptyPool)
        ));
    }

    #[test]
    fn test_from_config() {
        let config = RunConfig {
            tasks: 6,
            queue_capacity: 2,
            ..RunConfig::default()
        };
        let d = Dispatcher::from_config(&config, Arc::new(MockTransport::new()), Span::none());
        assert_eq!(d.tasks(), 6);
        assert_eq!(d.queue_capacity, 2);
    }
}
