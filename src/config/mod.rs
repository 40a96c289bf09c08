//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, workload files and
//! validation.

pub mod cli;
pub mod toml;
pub mod validator;
pub mod workload;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub use workload::{Call, FunctionDescriptor, Workload};

/// Capacity of the shared request queue between the dispatcher and workers
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Benchmark run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Number of concurrent workers
    #[serde(default = "default_tasks")]
    pub tasks: usize,
    /// Target host
    #[serde(default = "default_host")]
    pub host: String,
    /// Target port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Workload file
    #[serde(default = "default_workload")]
    pub workload: PathBuf,
    /// Run summary output path (stdout when unset)
    pub output: Option<PathBuf>,
    /// Per-call results CSV path
    pub results_csv: Option<PathBuf>,
    /// Request queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Per-request timeout in seconds (HTTP client default when unset)
    pub timeout_secs: Option<u64>,
}

fn default_tasks() -> usize {
    1
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_workload() -> PathBuf {
    PathBuf::from("workload.json")
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tasks: default_tasks(),
            host: default_host(),
            port: default_port(),
            workload: default_workload(),
            output: None,
            results_csv: None,
            queue_capacity: default_queue_capacity(),
            timeout_secs: None,
        }
    }
}

impl RunConfig {
    /// Base URL every call name is appended to
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/run", self.host, self.port)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target={} tasks={} workload={}",
            self.base_url(),
            self.tasks,
            self.workload.display()
        )?;
        if let Some(ref output) = self.output {
            write!(f, " output={}", output.display())?;
        }
        Ok(())
    }
}
