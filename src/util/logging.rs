//! Logging setup
//!
//! Verbosity is configured once at startup. The engine never reaches for a
//! global logger handle: callers build a run-scoped [`tracing::Span`] and
//! hand it to the dispatcher, which parents every worker span on it.

use tracing_subscriber::EnvFilter;

/// Default filter for the given verbosity
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `verbose`.
///
/// Logs go to stderr so stdout only carries the run summary.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
