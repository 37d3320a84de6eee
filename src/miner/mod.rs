// src/miner/mod.rs
//! Core mining functionality
//!
//! - Digest algorithms behind the [`Algorithm`] trait
//! - The nonce search state machine
//! - The cooperative engine that drives it
//! - The standalone double-hash preview

/// Digest algorithm implementations
pub mod algorithm;

/// Async engine: start/stop commands, snapshots and events
pub mod engine;

/// Double-hash preview used outside of mining
pub mod preview;

/// Per-run search state machine
pub mod search;

// Re-export main components for cleaner imports
pub use self::algorithm::{Algorithm, create_algorithm};
pub use self::engine::{MiningEngine, MiningEvent};
pub use self::preview::{DigestPair, compute_digest_pair, preview_digest_pair};
pub use self::search::{
    ProgressReport, ProofCheck, Search, SearchSnapshot, candidate_message, check_proof,
};
