// src/utils/mod.rs
//! Shared error handling and logging infrastructure

/// Error types and conversions
///
/// Contains the [`MinerError`] enum used across the crate.
pub mod error;

/// Logging initialization
pub mod logging;

// Re-export for easier access
pub use error::MinerError;
pub use logging::init_logging;
