//! Core shared library for the RetroCat catalog client.
//!
//! This crate exposes the primitives the other workspace members depend
//! on: the canonical error type, configuration loading, logging setup
//! and JSON helpers.

pub mod config;
pub mod errors;
pub mod logging;
pub mod serde_utils;

pub use config::{ClientConfig, Environment};
pub use errors::{CatalogError, ConfigError, Result as CoreResult};
