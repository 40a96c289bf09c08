//! Worker implementation
//!
//! A worker is the unit of concurrent execution. It pulls calls from the
//! shared request queue until the queue is closed and drained, performs each
//! call through the [`Transport`], and buffers a [`CallResult`] for every
//! success.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──run()──► Running ──queue closed──► Completed (buffer handed back)
//!                    │
//!                    └──────any error─────► Failed (error signalled)
//! ```
//!
//! There is no way back from `Completed` or `Failed`. Every request error is
//! fatal: the worker signals it on the error channel and returns without
//! pulling another call. Whatever is still queued is left to the other
//! workers or discarded by the dispatcher.

use crate::config::Call;
use crate::error::{BenchError, BenchResult};
use crate::stats::CallResult;
use crate::transport::Transport;
use chrono::Utc;
use crossbeam::channel::{Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;
use tracing::Span;

/// Worker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl WorkerState {
    /// Whether `self → next` is a legal transition
    pub fn can_transition_to(self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (WorkerState::Idle, WorkerState::Running)
                | (WorkerState::Running, WorkerState::Completed)
                | (WorkerState::Running, WorkerState::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkerState::Completed | WorkerState::Failed)
    }
}

/// How a worker ended
#[derive(Debug)]
pub enum WorkerExit {
    /// Queue closed and drained; carries the worker's results in its own
    /// completion order
    Completed(Vec<CallResult>),
    /// An error was signalled on the error channel
    Failed,
}

/// Executes calls from the shared queue
///
/// Each worker owns its result buffer exclusively until it hands it back in
/// [`WorkerExit::Completed`]. Workers share nothing mutable with each other.
pub struct Worker {
    /// Index within the pool
    id: usize,

    /// Shared transport to the target
    transport: Arc<dyn Transport>,

    /// Results of successful calls, in completion order
    results: Vec<CallResult>,

    state: WorkerState,

    /// Worker-scoped logger, parented on the run logger
    logger: Span,
}

impl Worker {
    /// Create an idle worker. `logger` is the run-scoped span; the worker logs
    /// under a child span carrying its id.
    pub fn new(id: usize, transport: Arc<dyn Transport>, logger: &Span) -> Self {
        Self {
            id,
            transport,
            results: Vec::new(),
            state: WorkerState::Idle,
            logger: tracing::debug_span!(parent: logger, "worker", worker_id = id),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Consume calls until the queue is closed and empty or a call fails
    ///
    /// On failure the error is sent on `errors` (which has one slot per
    /// worker, so the send never blocks) and the partial buffer is dropped.
    pub fn run(mut self, requests: Receiver<Call>, errors: Sender<BenchError>) -> WorkerExit {
        let logger = self.logger.clone();
        let _entered = logger.enter();

        self.transition(WorkerState::Running);
        tracing::debug!("Worker started");

        for call in requests.iter() {
            match self.execute(&call) {
                Ok(result) => {
                    tracing::trace!(call = %call, duration = result.duration, "Call completed");
                    self.results.push(result);
                }
                Err(err) => {
                    tracing::warn!(call = %call, error = %err, "Call failed, stopping worker");
                    self.transition(WorkerState::Failed);
                    // The dispatcher may already be gone after an abort
                    let _ = errors.send(err);
                    return WorkerExit::Failed;
                }
            }
        }

        self.transition(WorkerState::Completed);
        tracing::debug!(completed = self.results.len(), "Worker finished");
        WorkerExit::Completed(self.results)
    }

    /// Perform one call and time it
    fn execute(&self, call: &Call) -> BenchResult<CallResult> {
        let start = Utc::now();
        let clock = Instant::now();

        self.transport.invoke(call)?;

        let elapsed = clock.elapsed();
        let end = Utc::now();
        Ok(CallResult::new(call.name.clone(), start, end, elapsed))
    }

    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal worker transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{MockFailure, MockTransport};
    use crossbeam::channel::bounded;

    fn queue_of(names: &[&str]) -> Receiver<Call> {
        let (tx, rx) = bounded(names.len().max(1));
        for name in names {
            tx.send(Call::new(*name)).unwrap();
        }
        rx
    }

    #[test]
    fn test_state_transitions() {
        use WorkerState::*;

        assert!(Idle.can_transition_to(Running));
        assert!(Running.can_transition_to(Completed));
        assert!(Running.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Running));
        assert!(!Failed.can_transition_to(Running));
        assert!(!Idle.can_transition_to(Completed));
        assert!(Completed.is_terminal() && Failed.is_terminal());
        assert!(!Running.is_terminal());
    }

    #[test]
    fn test_worker_creation() {
        let worker = Worker::new(3, Arc::new(MockTransport::new()), &Span::none());
        assert_eq!(worker.id(), 3);
        assert_eq!(worker.state(), WorkerState::Idle);
    }

    #[test]
    fn test_run_drains_queue_in_order() {
        let transport = MockTransport::new();
        let worker = Worker::new(0, Arc::new(transport.clone()), &Span::none());
        let (err_tx, err_rx) = bounded(1);

        match worker.run(queue_of(&["a", "b", "c"]), err_tx) {
            WorkerExit::Completed(results) => {
                let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b", "c"]);
                assert!(results.iter().all(|r| r.duration >= 0.0 && r.end >= r.start));
            }
            WorkerExit::Failed => panic!("worker failed"),
        }
        assert!(err_rx.try_recv().is_err());
        assert_eq!(transport.invocation_count(), 3);
    }

    #[test]
    fn test_run_with_empty_closed_queue_completes() {
        let worker = Worker::new(0, Arc::new(MockTransport::new()), &Span::none());
        let (err_tx, _err_rx) = bounded(1);

        match worker.run(queue_of(&[]), err_tx) {
            WorkerExit::Completed(results) => assert!(results.is_empty()),
            WorkerExit::Failed => panic!("worker failed"),
        }
    }

    #[test]
    fn test_transport_error_stops_worker() {
        let transport = MockTransport::new();
        transport.fail_call("b", MockFailure::Transport);
        let worker = Worker::new(0, Arc::new(transport.clone()), &Span::none());
        let (err_tx, err_rx) = bounded(1);

        assert!(matches!(worker.run(queue_of(&["a", "b", "c"]), err_tx), WorkerExit::Failed));
        assert!(matches!(err_rx.try_recv(), Ok(BenchError::Transport { .. })));
        // "c" is never attempted
        assert_eq!(transport.invocation_count(), 2);
    }

    #[test]
    fn test_unexpected_status_stops_worker() {
        let transport = MockTransport::new();
        transport.fail_call("a", MockFailure::Status(404));
        let worker = Worker::new(0, Arc::new(transport.clone()), &Span::none());
        let (err_tx, err_rx) = bounded(1);

        assert!(matches!(worker.run(queue_of(&["a", "b"]), err_tx), WorkerExit::Failed));
        assert!(matches!(
            err_rx.try_recv(),
            Ok(BenchError::UnexpectedStatus { status: 404, .. })
        ));
        assert_eq!(transport.invocation_count(), 1);
    }

    #[test]
    fn test_body_read_error_stops_worker() {
        let transport = MockTransport::new();
        transport.fail_call("a", MockFailure::BodyRead);
        let worker = Worker::new(0, Arc::new(transport), &Span::none());
        let (err_tx, err_rx) = bounded(1);

        assert!(matches!(worker.run(queue_of(&["a"]), err_tx), WorkerExit::Failed));
        assert!(matches!(err_rx.try_recv(), Ok(BenchError::BodyRead { .. })));
    }
}
