//! Subscriber installation and per-operation spans.

pub mod spans;

use tracing_subscriber::EnvFilter;

/// Environment variable read for the log filter.
pub const LOG_ENV_VAR: &str = "PALATE_LOG";

/// Install a global fmt subscriber filtered by `PALATE_LOG`, falling back to
/// `default_filter` (e.g. `"info"` or `"palate_solver=debug"`).
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
