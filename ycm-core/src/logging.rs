//! Logging setup.
//!
//! The library only emits `tracing` events; hosts that want them on stderr
//! call [`init_logging`] once. `YCM_LOG` overrides the configured filter.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "YCM_LOG";

/// Install a stderr fmt subscriber. Returns false if one was already set.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
