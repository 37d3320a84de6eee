// src/miner/algorithm/mod.rs
//! Digest algorithms and their common interface
//!
//! Currently implements:
//! - Double SHA-256 (the mining digest)
//! - Single SHA-256 (linear-search variant)

/// SHA-256 based algorithms and the hex digest helpers
pub mod sha256;

use crate::types::AlgorithmType;
use crate::utils::error::MinerError;
use std::sync::Arc;

pub use self::sha256::{DoubleSha256, SingleSha256, hash_once, hash_twice};

/// Common interface for all digest algorithms
///
/// The search loop only talks to this trait, so a failing primitive can be
/// modelled and the failure handled as fatal to the run.
pub trait Algorithm: Send + Sync {
    /// Compute the 32-byte digest of `input`
    fn digest(&self, input: &[u8]) -> Result<[u8; 32], MinerError>;

    /// Get the algorithm type
    fn algorithm_type(&self) -> AlgorithmType;
}

/// Creates the algorithm instance for the configured type
pub fn create_algorithm(algo: AlgorithmType) -> Arc<dyn Algorithm> {
    match algo {
        AlgorithmType::Sha256d => Arc::new(DoubleSha256),
        AlgorithmType::Sha256 => Arc::new(SingleSha256),
    }
}

/// Count leading zero characters of the digest's hex encoding.
pub fn leading_zero_nibbles(hash: &[u8; 32]) -> u32 {
    let mut zeros = 0u32;
    for byte in hash.iter() {
        if *byte == 0 {
            zeros += 2;
        } else {
            if byte >> 4 == 0 {
                zeros += 1;
            }
            break;
        }
    }
    zeros
}

/// Whether `hex::encode(hash)` starts with `difficulty_zeros` zero characters.
///
/// Works on the raw bytes so the hot loop never has to hex-encode.
#[inline]
pub fn meets_difficulty(hash: &[u8; 32], difficulty_zeros: u32) -> bool {
    if difficulty_zeros > 64 {
        return false;
    }

    let full_bytes = (difficulty_zeros / 2) as usize;
    if hash[..full_bytes].iter().any(|b| *b != 0) {
        return false;
    }

    difficulty_zeros % 2 == 0 || hash[full_bytes] >> 4 == 0
}
