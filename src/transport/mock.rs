//! Mock transport for testing
//!
//! Simulates the benchmark target in-process: no sockets, configurable
//! latency, and per-call failures. Every invocation is recorded together with
//! the name of the thread that made it, so tests can check which worker ran
//! which call.
//!
//! # Example
//!
//! ```
//! use olbench::config::Call;
//! use olbench::transport::Transport;
//! use olbench::transport::mock::{MockFailure, MockTransport};
//!
//! let transport = MockTransport::new();
//! transport.fail_call("b", MockFailure::Status(500));
//!
//! assert!(transport.invoke(&Call::new("a")).is_ok());
//! assert!(transport.invoke(&Call::new("b")).is_err());
//! assert_eq!(transport.invocation_count(), 2);
//! ```

use super::{join_url, Transport};
use crate::config::Call;
use crate::error::{BenchError, BenchResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How a call configured to fail should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Connection-level failure
    Transport,
    /// Response with the given non-200 status
    Status(u16),
    /// Response whose body cannot be read
    BodyRead,
}

/// Record of an invocation for test verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRecord {
    pub name: String,
    /// Name of the invoking thread (workers are named `olbench-worker-{id}`)
    pub thread: Option<String>,
}

/// Mock transport
///
/// Clones share state, so a test can keep one handle while the pool owns
/// another.
#[derive(Clone)]
pub struct MockTransport {
    base_url: String,

    /// Simulated time to answer each call
    latency: Arc<Mutex<Duration>>,

    /// Calls that fail, by name
    failures: Arc<Mutex<HashMap<String, MockFailure>>>,

    /// Every invocation, in the order they reached the target
    invocations: Arc<Mutex<Vec<InvocationRecord>>>,
}

impl MockTransport {
    /// Succeeds every call immediately
    pub fn new() -> Self {
        Self {
            base_url: "http://mock/run".to_string(),
            latency: Arc::new(Mutex::new(Duration::ZERO)),
            failures: Arc::new(Mutex::new(HashMap::new())),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every call after `latency`
    pub fn with_latency(latency: Duration) -> Self {
        let transport = Self::new();
        transport.set_latency(latency);
        transport
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Make every call named `name` fail with `failure`
    pub fn fail_call(&self, name: impl Into<String>, failure: MockFailure) {
        self.failures.lock().unwrap().insert(name.into(), failure);
    }

    /// All invocations so far, in arrival order
    pub fn invocations(&self) -> Vec<InvocationRecord> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    /// Names of the calls made from the given thread, in order
    pub fn calls_from_thread(&self, thread_name: &str) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.thread.as_deref() == Some(thread_name))
            .map(|r| r.name.clone())
            .collect()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn invoke(&self, call: &Call) -> BenchResult<()> {
        self.invocations.lock().unwrap().push(InvocationRecord {
            name: call.name.clone(),
            thread: thread::current().name().map(str::to_string),
        });

        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            thread::sleep(latency);
        }

        let url = self.url_for(call);
        let failure = self.failures.lock().unwrap().get(&call.name).copied();
        match failure {
            None => Ok(()),
            Some(MockFailure::Transport) => Err(BenchError::Transport {
                url,
                source: "mock connection refused".into(),
            }),
            Some(MockFailure::Status(status)) => Err(BenchError::UnexpectedStatus {
                url,
                status,
                body: "mock failure".to_string(),
            }),
            Some(MockFailure::BodyRead) => Err(BenchError::BodyRead {
                url,
                source: "mock body truncated".into(),
            }),
        }
    }

    fn url_for(&self, call: &Call) -> String {
        join_url(&self.base_url, &call.name)
    }
}
