// src/model/mod.rs
//! Spoof target data model
//!
//! Records are produced by the management app and published as a single
//! JSON document. The engine only ever reads them.

pub mod cell;
pub mod location;

pub use cell::{NetworkType, SerializableCellInfo, UNSET};
pub use location::{LocationRecord, DEFAULT_LAT, DEFAULT_LNG};
