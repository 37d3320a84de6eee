// src/miner/search.rs
//! Nonce search state machine
//!
//! [`Search`] owns everything that changes during a run: the nonce, the rate
//! sampler, the journal and the result. It is driven one iteration at a time
//! by the engine task and never shared; observers only ever see the
//! [`SearchSnapshot`] values it produces.

use crate::config::EngineSettings;
use crate::miner::algorithm::{Algorithm, leading_zero_nibbles, meets_difficulty};
use crate::stats::{Journal, RateTracker, format_rate};
use crate::types::{LogEntry, LogKind, MiningConfiguration, MiningResult, MiningState};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;

/// Periodic progress sample emitted while a run is active
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    /// Nonce of the most recent attempt
    pub nonce: u64,
    /// Hashes per second since the previous sample
    pub rate: f64,
    /// Digest of the most recent attempt
    pub digest_hex: String,
}

/// What a single iteration produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Iteration {
    /// Set when the report interval elapsed during this iteration
    pub report: Option<ProgressReport>,
    /// Set when this iteration met the target
    pub result: Option<MiningResult>,
}

/// Read-only view of the engine, safe to hand to any observer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSnapshot {
    /// Lifecycle state
    pub state: MiningState,
    /// Next nonce to test (or the winning nonce once found)
    pub nonce: u64,
    /// Last sampled rate; `None` until the first sample
    pub current_rate: Option<f64>,
    /// Journal of the current run
    pub log: Vec<LogEntry>,
    /// Proof, present exactly when `state` is `Found`
    pub result: Option<MiningResult>,
    /// Configuration of the current run
    pub config: Option<MiningConfiguration>,
}

/// Outcome of checking a claimed nonce
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofCheck {
    /// Digest of `block_data + nonce`
    pub digest: [u8; 32],
    /// Same digest, hex encoded
    pub digest_hex: String,
    /// Leading zero hex characters of the digest
    pub leading_zeros: u32,
    /// Whether the digest meets the difficulty
    pub valid: bool,
}

/// The candidate message for `nonce`: block data followed by the decimal nonce
pub fn candidate_message(block_data: &str, nonce: u64) -> String {
    format!("{}{}", block_data, nonce)
}

/// Recomputes the digest for a claimed nonce and checks it against the target
pub fn check_proof(
    algorithm: &dyn Algorithm,
    config: &MiningConfiguration,
    nonce: u64,
) -> Result<ProofCheck, crate::MinerError> {
    let message = candidate_message(&config.block_data, nonce);
    let digest = algorithm.digest(message.as_bytes())?;

    Ok(ProofCheck {
        digest,
        digest_hex: hex::encode(digest),
        leading_zeros: leading_zero_nibbles(&digest),
        valid: meets_difficulty(&digest, config.difficulty_zeros),
    })
}

/// State of one mining run
pub struct Search {
    config: MiningConfiguration,
    algorithm: Arc<dyn Algorithm>,
    state: MiningState,
    nonce: u64,
    rate: RateTracker,
    current_rate: Option<f64>,
    journal: Journal,
    result: Option<MiningResult>,
    /// `block_data` followed by the decimal nonce; reused across iterations
    message: String,
}

impl Search {
    /// Creates a running search starting at nonce 0
    pub fn new(
        config: MiningConfiguration,
        algorithm: Arc<dyn Algorithm>,
        settings: &EngineSettings,
        now: Instant,
    ) -> Self {
        let message = String::with_capacity(config.block_data.len() + 20);

        Search {
            config,
            algorithm,
            state: MiningState::Running,
            nonce: 0,
            rate: RateTracker::new(settings.report_interval(), now),
            current_rate: None,
            journal: Journal::new(settings.log_capacity),
            result: None,
            message,
        }
    }

    /// Tests the current nonce
    ///
    /// On a miss the nonce advances by one. On a hit the result is recorded
    /// and the state moves to `Found`; further calls do nothing.
    ///
    /// # Errors
    /// Propagates a failure of the digest primitive. The caller decides the
    /// run is over; see [`Search::fail`].
    pub fn step(&mut self, now: Instant) -> Result<Iteration, crate::MinerError> {
        let mut iteration = Iteration::default();
        if self.state != MiningState::Running {
            return Ok(iteration);
        }

        self.message.clear();
        self.message.push_str(&self.config.block_data);
        // Formatting into a String cannot fail
        let _ = write!(self.message, "{}", self.nonce);

        let digest = self.algorithm.digest(self.message.as_bytes())?;

        if let Some(rate) = self.rate.sample(now, self.nonce) {
            let digest_hex = hex::encode(digest);
            self.current_rate = Some(rate);
            self.journal.push(LogEntry::new(
                LogKind::Info,
                format!(
                    "Rate: {} | Nonce: {} | Hash: {}",
                    format_rate(rate),
                    self.nonce,
                    digest_hex
                ),
            ));
            iteration.report = Some(ProgressReport {
                nonce: self.nonce,
                rate,
                digest_hex,
            });
        }

        if meets_difficulty(&digest, self.config.difficulty_zeros) {
            let result = MiningResult {
                nonce: self.nonce,
                digest_hex: hex::encode(digest),
            };
            self.journal.push(LogEntry::new(
                LogKind::Success,
                format!(
                    "Block mined! Nonce: {} | Hash: {}",
                    result.nonce, result.digest_hex
                ),
            ));
            self.result = Some(result.clone());
            self.state = MiningState::Found;
            iteration.result = Some(result);
        } else {
            self.nonce += 1;
        }

        Ok(iteration)
    }

    /// Cancels the run on user request
    pub fn stop(&mut self) {
        if self.state != MiningState::Running {
            return;
        }

        self.state = MiningState::Stopped;
        self.current_rate = Some(0.0);
        self.journal.push(LogEntry::new(
            LogKind::Stopped,
            format!("Mining stopped by user at nonce {}", self.nonce),
        ));
    }

    /// Ends the run after a digest failure
    pub fn fail(&mut self, error: &crate::MinerError) {
        if self.state != MiningState::Running {
            return;
        }

        self.state = MiningState::Stopped;
        self.current_rate = Some(0.0);
        self.journal.push(LogEntry::new(
            LogKind::Failure,
            format!("Mining failed at nonce {}: {}", self.nonce, error),
        ));
    }

    /// Next nonce to test, or the winning one
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Copies the observable state
    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            state: self.state,
            nonce: self.nonce,
            current_rate: self.current_rate,
            log: self.journal.entries().to_vec(),
            result: self.result.clone(),
            config: Some(self.config.clone()),
        }
    }
}
