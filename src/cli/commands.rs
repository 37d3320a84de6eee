// src/cli/commands.rs
use crate::types::AlgorithmType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Proof-of-work simulator: watch a nonce search the way Bitcoin miners do it
#[derive(Parser, Debug)]
#[command(name = "pow_sim-rs")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// Lower the default log level to debug
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The action to perform
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Show both passes of the double SHA-256 of a text
    Hash(HashOptions),

    /// Search for a nonce meeting the difficulty
    Mine(MineOptions),

    /// Check a claimed nonce (and optionally its digest)
    Verify(VerifyOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for the double-hash preview
#[derive(Parser, Debug)]
pub struct HashOptions {
    /// Text to hash (UTF-8)
    pub text: String,
}

/// Options for a mining run
#[derive(Parser, Debug)]
pub struct MineOptions {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Block data (overrides config)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Leading zero hex characters, 1-8 (overrides config)
    #[arg(short = 'z', long)]
    pub difficulty: Option<u32>,

    /// Digest algorithm (overrides config)
    #[arg(short, long)]
    pub algorithm: Option<AlgorithmType>,

    /// Stop after this many seconds (overrides config)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Print the final state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for checking a proof
#[derive(Parser, Debug)]
pub struct VerifyOptions {
    /// Block data the nonce was appended to
    #[arg(short, long)]
    pub data: String,

    /// Claimed nonce
    #[arg(short, long)]
    pub nonce: u64,

    /// Leading zero hex characters, 1-8
    #[arg(short = 'z', long)]
    pub difficulty: u32,

    /// Digest algorithm
    #[arg(short, long, default_value_t = AlgorithmType::Sha256d)]
    pub algorithm: AlgorithmType,

    /// Claimed digest in hex
    #[arg(long)]
    pub digest: Option<String>,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "pow-sim.toml")]
    pub output: PathBuf,
}
