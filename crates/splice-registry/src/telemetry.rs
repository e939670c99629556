//! Logging setup for host integrations.

use splice_core::{ConfigError, ExtensionConfig};
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`.
///
/// Returns `false` if a global subscriber was already installed, so repeated
/// calls are harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

/// Install logging for a host session using `config.log_filter` as the
/// fallback filter.
///
/// Malformed directives are rejected rather than silently dropped.
pub fn init_from_config(config: &ExtensionConfig) -> Result<bool, ConfigError> {
    EnvFilter::try_new(&config.log_filter)
        .map_err(|err| ConfigError::invalid("log_filter", err.to_string()))?;
    Ok(init_tracing(&config.log_filter))
}
