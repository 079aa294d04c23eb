// src/utils/config.rs
//! Engine configuration
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. Built-in defaults (every field has one)
//! 2. Optional TOML file (`GEOMOCK_CONFIG`, else [`DEFAULT_SETTINGS_PATH`])
//! 3. Environment variables prefixed `GEOMOCK__`, e.g. `GEOMOCK__STORE__PATH`

use crate::utils::errors::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Well-known location of the published spoof target
pub const DEFAULT_CONFIG_PATH: &str = "/data/local/tmp/mock_location.loc";

/// Optional engine settings file
pub const DEFAULT_SETTINGS_PATH: &str = "/data/local/tmp/geomock.toml";

/// Package name of the management app
pub const MANAGER_PACKAGE: &str = "com.mock.location";

/// Package name reported for the OS system process
pub const SYSTEM_PACKAGE: &str = "android";

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub store: StoreConfig,
    pub engine: InterceptionConfig,
    pub logging: LoggingConfig,
}

/// Where and how the spoof target is read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the published record
    pub path: PathBuf,

    /// Files larger than this are treated as unavailable
    pub max_config_bytes: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_PATH),
            max_config_bytes: 64 * 1024,
        }
    }
}

/// Interception behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptionConfig {
    /// Packages that never get hooks
    pub excluded_packages: Vec<String>,
}

impl Default for InterceptionConfig {
    fn default() -> Self {
        Self {
            excluded_packages: vec![SYSTEM_PACKAGE.to_string(), MANAGER_PACKAGE.to_string()],
        }
    }
}

impl InterceptionConfig {
    pub fn is_excluded(&self, package_name: &str) -> bool {
        self.excluded_packages.iter().any(|p| p == package_name)
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "geomock_engine=info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load from the default settings location and the environment
    pub fn load() -> Result<Self> {
        let path = std::env::var("GEOMOCK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH));
        Self::load_from(&path)
    }

    /// Load from an explicit settings file (missing file is fine)
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("GEOMOCK")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("engine.excluded_packages")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.store.path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(config.store.max_config_bytes, 64 * 1024);
        assert!(config.engine.is_excluded("android"));
        assert!(config.engine.is_excluded("com.mock.location"));
        assert!(!config.engine.is_excluded("com.example.maps"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.store.path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!config.logging.json);
    }

    #[test]
    fn test_file_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[store]
path = "/tmp/spoof.loc"

[engine]
excluded_packages = ["com.example.skip"]

[logging]
json = true
"#
        )
        .unwrap();

        let config = EngineConfig::load_from(file.path()).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/tmp/spoof.loc"));
        assert_eq!(config.store.max_config_bytes, 64 * 1024);
        assert!(config.engine.is_excluded("com.example.skip"));
        assert!(!config.engine.is_excluded("android"));
        assert!(config.logging.json);
    }
}
