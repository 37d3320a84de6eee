//! Proof-of-work simulator - Bitcoin-style nonce search for teaching
//!
//! This crate demonstrates how a miner searches for a nonce:
//! - Double SHA-256 of `block data + nonce`
//! - A difficulty expressed as leading zero hex characters
//! - A cooperative, cancellable search loop with periodic rate reports
//! - A standalone double-hash preview

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Search engine, digest algorithms and the hash preview
pub mod miner;

/// Rate tracking, run journal and event reporting
pub mod stats;

/// Error handling and logging
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::{Config, EngineSettings};
pub use miner::{
    Algorithm, DigestPair, MiningEngine, MiningEvent, SearchSnapshot, compute_digest_pair,
    create_algorithm, preview_digest_pair,
};
pub use miner::algorithm::{hash_once, hash_twice};
pub use stats::{StatsReporter, format_rate};
pub use types::{AlgorithmType, LogEntry, LogKind, MiningConfiguration, MiningResult, MiningState};
pub use utils::{MinerError, init_logging};
