//! Diagnostic logging
//!
//! Harness internals log through `tracing`. Report lines never do; they go
//! to the suite's sink so the console format stays exact.

use tracing_subscriber::EnvFilter;

/// Filter used when the requested directives do not parse
pub const FALLBACK_FILTER: &str = "warn";

/// Install a stderr subscriber filtered by `directives`
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(directives: &str) -> bool {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
