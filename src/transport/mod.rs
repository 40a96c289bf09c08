//! Transport abstraction
//!
//! A transport performs one call against the benchmark target. Workers are
//! agnostic to how the call reaches the target; they only time it and record
//! the outcome.
//!
//! # Wire protocol
//!
//! `POST {base_url}/{call.name}` with the literal body `null` and
//! `Content-Type: text/json`. HTTP 200 is success; any other status is an
//! [`BenchError::UnexpectedStatus`], connection and timeout failures are
//! [`BenchError::Transport`], and an unreadable body is
//! [`BenchError::BodyRead`].
//!
//! # Implementations
//!
//! - [`http::HttpTransport`]: blocking HTTP client, used for real runs
//! - [`mock::MockTransport`]: in-process target for tests

pub mod http;
pub mod mock;

use crate::config::Call;
use crate::error::BenchResult;

/// Body sent with every call
pub const REQUEST_BODY: &str = "null";

/// Content type sent with every call
pub const REQUEST_CONTENT_TYPE: &str = "text/json";

/// Performs calls against the benchmark target
///
/// Shared by all workers of a pool, so implementations must be `Send + Sync`.
/// `invoke` blocks until the response has been fully read.
pub trait Transport: Send + Sync {
    /// Execute one call. `Ok` means the target answered HTTP 200 and the
    /// response body was consumed.
    fn invoke(&self, call: &Call) -> BenchResult<()>;

    /// Target URL for a call
    fn url_for(&self, call: &Call) -> String;
}

/// Join a base URL and a call name with exactly one `/`
///
/// # Examples
///
/// ```
/// use olbench::transport::join_url;
///
/// assert_eq!(join_url("http://localhost:5000/run", "fn0"), "http://localhost:5000/run/fn0");
/// assert_eq!(join_url("http://localhost:5000/run/", "/fn0"), "http://localhost:5000/run/fn0");
/// ```
pub fn join_url(base: &str, name: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        name.trim_start_matches('/')
    )
}
