//! Fixed-size worker pool
//!
//! Three channels connect the pool to its workers:
//!
//! - **request queue**: bounded FIFO of calls shared by all workers. A full
//!   queue blocks [`WorkerPool::submit`], which keeps submission from running
//!   far ahead of execution.
//! - **error channel**: one slot per worker; a failing worker signals here
//!   exactly once.
//! - **result return**: each worker thread's join handle, which yields its
//!   result buffer.
//!
//! Closing the request queue is the only shutdown signal. Workers never look
//! at the error channel; in-flight calls always run to completion.

use crate::config::Call;
use crate::error::{BenchError, BenchResult};
use crate::stats::CallResult;
use crate::transport::Transport;
use crate::worker::{Worker, WorkerExit};
use crossbeam::channel::{bounded, select, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::Span;

/// Thread name prefix for pool workers
pub const WORKER_THREAD_PREFIX: &str = "olbench-worker-";

/// Thread name of the worker with the given index
pub fn worker_thread_name(id: usize) -> String {
    format!("{}{}", WORKER_THREAD_PREFIX, id)
}

/// A fixed set of worker threads fed from one bounded queue
pub struct WorkerPool {
    /// Producer side of the request queue; `None` once closed
    request_tx: Option<Sender<Call>>,

    /// Kept to discard queued calls on abort
    request_rx: Receiver<Call>,

    /// Terminal error signals from workers
    error_rx: Receiver<BenchError>,

    /// One handle per worker, in index order
    handles: Vec<JoinHandle<WorkerExit>>,

    /// Calls accepted into the queue
    submitted: usize,
}

impl WorkerPool {
    /// Start `size` workers eagerly. All of them are running before this
    /// returns, so no call is sent before the pool is complete.
    pub fn start(
        size: usize,
        queue_capacity: usize,
        transport: Arc<dyn Transport>,
        logger: &Span,
    ) -> BenchResult<Self> {
        if size == 0 {
            return Err(BenchError::EmptyPool);
        }

        let (request_tx, request_rx) = bounded::<Call>(queue_capacity);
        let (error_tx, error_rx) = bounded::<BenchError>(size);

        let mut handles = Vec::with_capacity(size);
        for id in 0..size {
            let worker = Worker::new(id, Arc::clone(&transport), logger);
            let requests = request_rx.clone();
            let errors = error_tx.clone();

            let handle = thread::Builder::new()
                .name(worker_thread_name(id))
                .spawn(move || worker.run(requests, errors))
                .map_err(|source| BenchError::Spawn { id, source })?;
            handles.push(handle);
        }

        Ok(Self {
            request_tx: Some(request_tx),
            request_rx,
            error_rx,
            handles,
            submitted: 0,
        })
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Calls accepted so far
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Enqueue a call, blocking while the queue is full
    ///
    /// Fails fast: if any worker has already signalled an error, or signals
    /// one while this call waits for queue space, that error is returned and
    /// the call is not enqueued.
    pub fn submit(&mut self, call: Call) -> BenchResult<()> {
        let request_tx = self.request_tx.clone().ok_or(BenchError::PoolClosed)?;

        if let Ok(err) = self.error_rx.try_recv() {
            return Err(err);
        }

        let outcome = select! {
            send(request_tx, call) -> sent => match sent {
                Ok(()) => Ok(()),
                // Every worker is gone, so each one signalled first
                Err(_) => Err(self.error_rx.try_recv().unwrap_or(BenchError::PoolClosed)),
            },
            recv(self.error_rx) -> signalled => Err(signalled.unwrap_or(BenchError::PoolClosed)),
        };

        if outcome.is_ok() {
            self.submitted += 1;
        }
        outcome
    }

    /// Close the queue, wait for every worker, and hand back their result
    /// batches in worker index order
    ///
    /// Any signalled error fails the whole pool; partial batches are
    /// discarded.
    pub fn finish(mut self) -> BenchResult<Vec<Vec<CallResult>>> {
        self.request_tx = None;

        let handles = std::mem::take(&mut self.handles);
        let mut batches = Vec::with_capacity(handles.len());
        let mut panicked = None;

        for (id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(WorkerExit::Completed(results)) => batches.push(results),
                Ok(WorkerExit::Failed) => {}
                Err(_) => {
                    panicked.get_or_insert(id);
                }
            }
        }

        if let Ok(err) = self.error_rx.try_recv() {
            return Err(err);
        }
        if let Some(id) = panicked {
            return Err(BenchError::WorkerPanicked(id));
        }

        Ok(batches)
    }

    /// Stop feeding workers without waiting for them
    ///
    /// Queued calls are discarded and the queue is closed, so each worker
    /// exits after its in-flight call.
    pub fn abort(mut self) {
        let discarded = self.close_and_discard();
        tracing::debug!(
            submitted = self.submitted,
            discarded,
            "Worker pool aborted"
        );
    }

    fn close_and_discard(&mut self) -> usize {
        self.request_tx = None;
        self.request_rx.try_iter().count()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close_and_discard();
    }
}
