// src/lib.rs
//! GeoMock Interception Engine Library
//!
//! Makes a hosted application observe an operator-chosen location by
//! substituting the results of OS location and radio accessors after they
//! run, instead of going through the platform's test-location provider.
//!
//! # Architecture
//!
//! The engine is structured into several key modules:
//!
//! - **model**: spoof target records as published by the management app
//! - **state**: config store and the total resolver on top of it
//! - **platform**: versioned adapters building replacement radio objects
//! - **interception**: hook registration, substitution and anti-detection
//! - **entry**: the process-load entry point called by the host runtime
//! - **observability**: tracing and metrics setup
//! - **utils**: settings and error types

// Public module exports
pub mod entry;
pub mod interception;
pub mod model;
pub mod observability;
pub mod platform;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use entry::handle_load_package;
pub use interception::{HookRuntime, InterceptionEngine, LoadOutcome, LoadPackageParam};
pub use model::{LocationRecord, NetworkType, SerializableCellInfo};
pub use state::{ConfigStore, FileConfigStore, MockStateResolver};
pub use utils::config::EngineConfig;
pub use utils::errors::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = env!("GIT_HASH");

/// Engine build information
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            git_hash: GIT_HASH,
            build_timestamp: env!("BUILD_TIMESTAMP"),
            rustc_version: env!("RUSTC_VERSION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_build_info() {
        let info = BuildInfo::current();
        assert!(!info.version.is_empty());
        assert!(!info.git_hash.is_empty());
    }
}
