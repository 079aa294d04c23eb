// src/utils/mod.rs
//! Common utilities: engine settings and error types

pub mod config;
pub mod errors;
