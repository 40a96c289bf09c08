//! Error types for the benchmark engine
//!
//! Every error a worker can hit is fatal to the whole run. Workers forward
//! these unfiltered to the dispatcher, which aborts without emitting a
//! partial aggregate.

use thiserror::Error;

/// Boxed source error carried by transport-level failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Benchmark engine error
#[derive(Error, Debug)]
pub enum BenchError {
    /// Connection or timeout failure reaching the target
    #[error("failed request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Target answered with something other than HTTP 200
    #[error("failed request to {url}: status {status}, text '{body}'")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// Response body could not be fully consumed
    #[error("failed request to {url}, could not read body: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: BoxError,
    },

    /// A pool was asked to start with zero workers
    #[error("worker pool needs at least one worker")]
    EmptyPool,

    /// A worker thread could not be spawned
    #[error("failed to spawn worker {id}: {source}")]
    Spawn {
        id: usize,
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked before reporting its terminal state
    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    /// Work was submitted after the pool stopped accepting calls
    #[error("worker pool is closed")]
    PoolClosed,
}

impl BenchError {
    /// Whether this error came from talking to the target (as opposed to
    /// the pool itself)
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            BenchError::Transport { .. }
                | BenchError::UnexpectedStatus { .. }
                | BenchError::BodyRead { .. }
        )
    }
}

/// Result type for engine operations
pub type BenchResult<T> = std::result::Result<T, BenchError>;
