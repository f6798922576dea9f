//! Logging configuration for promtable.
//!
//! The crate itself only emits `tracing` events; embedding applications
//! usually install their own subscriber. This helper covers the standalone
//! case (examples, debugging, test binaries).

use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr.
///
/// Honors `RUST_LOG` when set, defaulting to `info`. Calling this twice
/// panics (a global subscriber may only be installed once), so it belongs
/// in binary entry points, not in library code paths.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
