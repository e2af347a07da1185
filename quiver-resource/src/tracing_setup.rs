//! Tracing subscriber setup for binaries and long-running embeddings.

use tracing_subscriber::EnvFilter;

/// Initialize human-readable tracing output.
///
/// Respects the `QUIVER_LOG` environment variable for filtering;
/// defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUIVER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Initialize structured JSON tracing output for log shipping.
pub fn init_tracing_json() {
    let filter = EnvFilter::try_from_env("QUIVER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .init();
}
