// src/observability/mod.rs
//! Logging and metrics setup
//!
//! Hooks log through `tracing` and count through the `metrics` facade.
//! Both are no-ops until a subscriber / recorder is installed.

use crate::utils::config::LoggingConfig;
use crate::utils::errors::{EngineError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level. Fails if a subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| EngineError::Config(format!("invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| EngineError::Config(format!("tracing already initialized: {}", e)))
}

/// Register descriptions for the engine's counters
pub fn describe_metrics() {
    metrics::describe_counter!(
        "geomock_resolutions_total",
        "Spoof target resolutions, by source (config or default)"
    );
    metrics::describe_counter!(
        "geomock_substitutions_total",
        "Intercepted calls whose result was replaced, by surface"
    );
    metrics::describe_counter!(
        "geomock_passthrough_total",
        "Intercepted calls that kept the original result, by surface"
    );
    metrics::describe_counter!(
        "geomock_hook_install_total",
        "Hook registrations, by surface and outcome"
    );
}
