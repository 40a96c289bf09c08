//! Coordinator module
//!
//! Orchestrates workers and aggregates results.
//!
//! - `pool`: fixed-size worker pool with a bounded request queue
//! - `dispatcher`: feeds a workload through a pool and computes throughput

pub mod dispatcher;
pub mod pool;

pub use dispatcher::{Dispatcher, RunReport};
pub use pool::WorkerPool;
