// src/state/mod.rs
//! Spoof target state
//!
//! - **Config Store**: reads the externally published record
//! - **Resolver**: turns a missing or broken record into the default one
//!
//! # Read path
//!
//! ```text
//! Hook fires → resolve() → read_current() → parse
//!                   │            │
//!                   │            └─ None (absent / truncated / malformed)
//!                   └──────────────→ default coordinate
//! ```
//!
//! There is no cache: every intercepted call re-reads the record.

pub mod config_store;
pub mod resolver;

pub use config_store::{parse_record, ConfigStore, FileConfigStore, MemoryConfigStore};
pub use resolver::{MockStateResolver, Resolution, ResolutionSource};
