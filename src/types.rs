// src/types.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest accepted difficulty (leading zero hex characters)
pub const MIN_DIFFICULTY: u32 = 1;

/// Largest accepted difficulty; keeps expected runtimes interactive
pub const MAX_DIFFICULTY: u32 = 8;

/// Supported digest algorithms
///
/// The simulator mines with double SHA-256 like Bitcoin block headers.
/// Single SHA-256 is kept for the simpler linear-search variant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmType {
    /// SHA-256 applied twice, second pass over the raw digest bytes
    #[default]
    #[value(name = "sha256d")]
    Sha256d,

    /// A single SHA-256 pass
    #[value(name = "sha256")]
    Sha256,
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmType::Sha256d => write!(f, "sha256d"),
            AlgorithmType::Sha256 => write!(f, "sha256"),
        }
    }
}

impl FromStr for AlgorithmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256d" | "double-sha256" => Ok(AlgorithmType::Sha256d),
            "sha256" => Ok(AlgorithmType::Sha256),
            _ => Err(format!("Unknown algorithm: {}", s)),
        }
    }
}

/// Parameters of a single mining run
///
/// Immutable once a run starts; start a new run to change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningConfiguration {
    /// Payload the nonce is appended to
    pub block_data: String,
    /// Required number of leading `0` characters in the hex digest
    pub difficulty_zeros: u32,
}

impl MiningConfiguration {
    /// Creates a configuration, clamping the difficulty into `[1, 8]`
    pub fn new(block_data: impl Into<String>, difficulty_zeros: u32) -> Self {
        let clamped = difficulty_zeros.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        if clamped != difficulty_zeros {
            log::warn!(
                "Difficulty {} out of range, clamped to {}",
                difficulty_zeros,
                clamped
            );
        }

        MiningConfiguration {
            block_data: block_data.into(),
            difficulty_zeros: clamped,
        }
    }

    /// The hex prefix a qualifying digest must start with
    pub fn target_prefix(&self) -> String {
        "0".repeat(self.difficulty_zeros as usize)
    }

    /// Expected number of attempts before a hit (16^difficulty)
    pub fn expected_attempts(&self) -> u64 {
        16u64.pow(self.difficulty_zeros)
    }
}

/// Lifecycle of the search engine
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiningState {
    /// No run has been started yet
    #[default]
    Idle,
    /// A run is in progress
    Running,
    /// The run ended with a qualifying digest
    Found,
    /// The run was cancelled or failed
    Stopped,
}

impl fmt::Display for MiningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiningState::Idle => write!(f, "idle"),
            MiningState::Running => write!(f, "running"),
            MiningState::Found => write!(f, "found"),
            MiningState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Proof produced by a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningResult {
    /// Smallest nonce whose digest met the target
    pub nonce: u64,
    /// Lowercase hex digest of `block_data + nonce`
    pub digest_hex: String,
}

/// Category of a journal line
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Periodic progress sample, subject to the journal cap
    Info,
    /// Qualifying digest found
    Success,
    /// Run cancelled by the user
    Stopped,
    /// Run aborted by a digest failure
    Failure,
}

impl LogKind {
    /// Terminal entries are never evicted from the journal
    pub fn is_terminal(self) -> bool {
        !matches!(self, LogKind::Info)
    }
}

/// One line of the run journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Entry category
    pub kind: LogKind,
    /// Rendered message
    pub message: String,
}

impl LogEntry {
    /// Creates a new entry
    pub fn new(kind: LogKind, message: impl Into<String>) -> Self {
        LogEntry {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
