//! olbench - Load-testing harness for OpenLambda
//!
//! Runs a workload of function calls against an OpenLambda worker over HTTP
//! with a fixed pool of concurrent workers, and reports elapsed wall-clock
//! time and mean throughput.
//!
//! # Architecture
//!
//! - **Workloads**: JSON files of functions and calls (`config::workload`)
//! - **Registration**: function bodies written into the environment registry
//! - **Dispatcher**: feeds calls to a bounded queue, stops on the first failure
//! - **Workers**: one OS thread each, recording a result per successful call
//! - **Transports**: blocking HTTP, plus a recording mock for tests

pub mod config;
pub mod coordinator;
pub mod error;
pub mod output;
pub mod registry;
pub mod stats;
pub mod transport;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::{Call, FunctionDescriptor, RunConfig, Workload};
pub use coordinator::{Dispatcher, RunReport};
pub use error::{BenchError, BenchResult};
pub use transport::Transport;

/// Result type used by the CLI-facing layers
pub type Result<T> = anyhow::Result<T>;
