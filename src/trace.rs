//! Tracing initialization for embedders and binaries.

use tracing_subscriber::EnvFilter;

/// Initialize a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Safe to call once per process; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
