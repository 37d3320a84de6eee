// src/miner/preview.rs
//! Double-hash preview, independent of mining

use crate::miner::algorithm::sha256::sha256;
use serde::Serialize;

/// Both passes of a double SHA-256, hex encoded
///
/// Both fields are `None` for empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DigestPair {
    /// SHA-256 of the UTF-8 input
    pub first_pass: Option<String>,
    /// SHA-256 of the raw first-pass digest
    pub second_pass: Option<String>,
}

/// Computes both passes of the double hash of `text`
pub fn compute_digest_pair(text: &str) -> DigestPair {
    if text.is_empty() {
        return DigestPair::default();
    }

    let first = sha256(text.as_bytes());
    let second = sha256(&first);

    DigestPair {
        first_pass: Some(hex::encode(first)),
        second_pass: Some(hex::encode(second)),
    }
}

/// Same as [`compute_digest_pair`], yielding to the scheduler after each pass
///
/// Lets a progress indicator on the same runtime render between passes.
pub async fn preview_digest_pair(text: &str) -> DigestPair {
    if text.is_empty() {
        return DigestPair::default();
    }

    let first = sha256(text.as_bytes());
    tokio::task::yield_now().await;
    let second = sha256(&first);
    tokio::task::yield_now().await;

    DigestPair {
        first_pass: Some(hex::encode(first)),
        second_pass: Some(hex::encode(second)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    #[test]
    fn test_empty_input_yields_no_hashes() {
        assert_eq!(compute_digest_pair(""), DigestPair::default());
    }

    #[test]
    fn test_matches_independent_sha256d() {
        let pair = compute_digest_pair("Hello Bitcoin!");

        let first = Sha256::digest("Hello Bitcoin!".as_bytes());
        let second = Sha256::digest(first);

        assert_eq!(pair.first_pass, Some(hex::encode(first)));
        assert_eq!(pair.second_pass, Some(hex::encode(second)));
        assert_eq!(pair, compute_digest_pair("Hello Bitcoin!"));
    }

    #[tokio::test]
    async fn test_async_preview_matches_sync() {
        assert_eq!(
            preview_digest_pair("Hello Bitcoin!").await,
            compute_digest_pair("Hello Bitcoin!")
        );
        assert_eq!(preview_digest_pair("").await, DigestPair::default());
    }
}
