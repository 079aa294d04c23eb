// src/entry.rs
//! Process-load entry point
//!
//! The host runtime calls [`handle_load_package`] once per package load.
//! The first call in a process builds the engine from the settings file;
//! the engine then lives as long as the process does.

use crate::interception::{InterceptionEngine, LoadOutcome, LoadPackageParam};
use crate::observability::{describe_metrics, init_tracing};
use crate::utils::config::EngineConfig;
use once_cell::sync::OnceCell;
use tracing::warn;

static ENGINE: OnceCell<InterceptionEngine> = OnceCell::new();

/// The process-wide engine, built on first use
pub fn engine() -> &'static InterceptionEngine {
    ENGINE.get_or_init(|| {
        let loaded = EngineConfig::load();
        let config = loaded.as_ref().cloned().unwrap_or_default();

        // A host process may already own the global subscriber.
        let _ = init_tracing(&config.logging);
        describe_metrics();

        if let Err(e) = &loaded {
            warn!("Falling back to default engine settings: {}", e);
        }
        InterceptionEngine::from_config(&config)
    })
}

/// Handle one package-load notification
pub fn handle_load_package(param: &LoadPackageParam<'_>) -> LoadOutcome {
    engine().on_package_loaded(param)
}
