// src/config/mod.rs
//! Configuration management
//!
//! Loads the TOML configuration file, supplies defaults and renders the
//! commented template written by the `config` subcommand.

/// Core configuration implementation
pub mod config;

// Re-export key items for easy access
pub use config::{Config, EngineSettings};

use crate::utils::error::MinerError;
use std::path::PathBuf;

/// Loads simulator configuration from a TOML file
pub fn load(path: impl Into<PathBuf>) -> Result<Config, MinerError> {
    Config::load(path)
}

/// Generates a commented configuration template
pub fn generate_template() -> String {
    Config::generate_template()
}
