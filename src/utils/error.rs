// src/utils/error.rs
use serde_json;
use std::io;
use thiserror::Error;

/// Main error type for the simulator
///
/// Covers digest failures, configuration problems, I/O, serialization
/// and the async task that drives the search loop.
#[derive(Error, Debug)]
pub enum MinerError {
    /// The digest primitive failed; fatal to the current run
    #[error("Algorithm error: {0}")]
    AlgorithmError(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    InputError(String),

    /// Async task execution errors
    #[error("Task execution error: {0}")]
    TaskError(String),
}

/// Converts hex decoding errors into MinerError
///
/// Raised when a claimed digest passed on the command line is not valid hex.
impl From<hex::FromHexError> for MinerError {
    fn from(e: hex::FromHexError) -> Self {
        MinerError::InputError(format!("Hex conversion failed: {}", e))
    }
}

/// Converts async task join errors into MinerError
///
/// Surfaces a panicked or aborted search task to whoever awaits the run.
impl From<tokio::task::JoinError> for MinerError {
    fn from(e: tokio::task::JoinError) -> Self {
        MinerError::TaskError(format!("Search task failed: {}", e))
    }
}
