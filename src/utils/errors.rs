// src/utils/errors.rs
//! Engine error types
//!
//! None of these ever reach a hooked application. Hooks translate every
//! variant into "keep the original value" or "use the default record";
//! the variants exist for logging, install reports and the probe CLI.

use crate::interception::surfaces::Surface;
use thiserror::Error;

/// Result alias used across the engine
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Config file missing, unreadable or oversized
    #[error("config unavailable: {0}")]
    ConfigUnavailable(String),

    /// Config file content could not be parsed as a location record
    #[error("config malformed: {0}")]
    ConfigMalformed(String),

    /// A hook could not be registered for one surface
    #[error("failed to install hook for {surface}: {reason}")]
    HookInstallFailed { surface: Surface, reason: String },

    /// A replacement platform object could not be built
    #[error("cannot synthesize value for {surface}: {reason}")]
    SynthesisFailed { surface: Surface, reason: String },

    /// Engine settings failed to load
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Config(err.to_string())
    }
}
