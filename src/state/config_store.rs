// src/state/config_store.rs
//! Read-only access to the published spoof target
//!
//! The record is written by an external privileged process with no
//! coordination. Any read may therefore see a missing file, a partially
//! written document or stale content; all of those come back as `None`.

use crate::model::LocationRecord;
use crate::utils::config::StoreConfig;
use crate::utils::errors::{EngineError, Result};
use parking_lot::RwLock;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Source of the current spoof target
pub trait ConfigStore: Send + Sync {
    /// Current record, or `None` when nothing valid can be read right now
    fn read_current(&self) -> Option<LocationRecord>;
}

/// Parse the published JSON document
pub fn parse_record(content: &str) -> Result<LocationRecord> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(EngineError::ConfigMalformed("empty document".to_string()));
    }
    // serde would also accept a positional array for the struct
    if !trimmed.starts_with('{') {
        return Err(EngineError::ConfigMalformed("expected a JSON object".to_string()));
    }

    serde_json::from_str(trimmed).map_err(|e| EngineError::ConfigMalformed(e.to_string()))
}

/// Store backed by a file at a fixed, world-readable path
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    max_bytes: u64,
}

impl FileConfigStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            path: config.path.clone(),
            max_bytes: config.max_config_bytes,
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(&StoreConfig {
            path: path.into(),
            ..StoreConfig::default()
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse, keeping the reason when nothing usable is there
    pub fn read_checked(&self) -> Result<LocationRecord> {
        let file = File::open(&self.path).map_err(|e| {
            EngineError::ConfigUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let len = file
            .metadata()
            .map_err(|e| EngineError::ConfigUnavailable(e.to_string()))?
            .len();
        if len > self.max_bytes {
            return Err(EngineError::ConfigUnavailable(format!(
                "{} is {} bytes, limit is {}",
                self.path.display(),
                len,
                self.max_bytes
            )));
        }

        let mut bytes = Vec::with_capacity(len as usize);
        // Bounded read; the file may grow between metadata() and here.
        file.take(self.max_bytes + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| EngineError::ConfigUnavailable(e.to_string()))?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(EngineError::ConfigUnavailable(format!(
                "{} grew past {} bytes while reading",
                self.path.display(),
                self.max_bytes
            )));
        }

        let content = std::str::from_utf8(&bytes)
            .map_err(|e| EngineError::ConfigMalformed(format!("not UTF-8: {}", e)))?;

        parse_record(content)
    }
}

impl ConfigStore for FileConfigStore {
    fn read_current(&self) -> Option<LocationRecord> {
        match self.read_checked() {
            Ok(record) => Some(record),
            Err(e) => {
                trace!("No usable record at {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// In-memory store holding raw document text
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    content: RwLock<Option<String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: &LocationRecord) -> Self {
        let store = Self::new();
        store.publish(record);
        store
    }

    /// Replace the document with a serialized record
    pub fn publish(&self, record: &LocationRecord) {
        // Serializing plain data with string keys cannot fail.
        let json = serde_json::to_string(record).unwrap_or_default();
        *self.content.write() = Some(json);
    }

    /// Replace the document with arbitrary text
    pub fn publish_raw(&self, content: impl Into<String>) {
        *self.content.write() = Some(content.into());
    }

    pub fn clear(&self) {
        *self.content.write() = None;
    }

    pub fn read_checked(&self) -> Result<LocationRecord> {
        match self.content.read().as_deref() {
            Some(content) => parse_record(content),
            None => Err(EngineError::ConfigUnavailable("nothing published".to_string())),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read_current(&self) -> Option<LocationRecord> {
        self.read_checked().ok()
    }
}
