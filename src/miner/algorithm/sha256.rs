// src/miner/algorithm/sha256.rs
//! SHA-256 digests
//!
//! Bitcoin hashes block headers with SHA-256 applied twice, where the second
//! pass consumes the raw 32 digest bytes of the first. Hashing the hex text
//! of the first pass would give a different (wrong) result.

use crate::miner::algorithm::Algorithm;
use crate::types::AlgorithmType;
use crate::utils::error::MinerError;
use sha2::{Digest, Sha256};

/// Single SHA-256 hash.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    result
}

/// Bitcoin's double SHA-256: SHA256(SHA256(data)).
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// SHA-256 of `data` as 64 lowercase hex characters
pub fn hash_once(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Double SHA-256 of `data` as 64 lowercase hex characters
pub fn hash_twice(data: &[u8]) -> String {
    hex::encode(double_sha256(data))
}

/// Double SHA-256, the digest the simulator mines with
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleSha256;

impl Algorithm for DoubleSha256 {
    fn digest(&self, input: &[u8]) -> Result<[u8; 32], MinerError> {
        Ok(double_sha256(input))
    }

    fn algorithm_type(&self) -> AlgorithmType {
        AlgorithmType::Sha256d
    }
}

/// Single SHA-256 for the linear-search variant
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleSha256;

impl Algorithm for SingleSha256 {
    fn digest(&self, input: &[u8]) -> Result<[u8; 32], MinerError> {
        Ok(sha256(input))
    }

    fn algorithm_type(&self) -> AlgorithmType {
        AlgorithmType::Sha256
    }
}
