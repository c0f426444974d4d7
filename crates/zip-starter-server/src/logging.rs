//! Logging init.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,zip_starter_server=debug,tower_http=debug";

/// Initialize structured logging to stderr, honouring `RUST_LOG` when set.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
