//! Tracing subscriber setup. Output goes to stderr so JSON on stdout stays parseable.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "RECRUITSIM_LOG";

/// Install the global fmt subscriber, filtered by `RECRUITSIM_LOG` (default `info`).
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
