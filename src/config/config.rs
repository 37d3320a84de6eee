// src/config/config.rs
use crate::stats::{DEFAULT_LOG_CAPACITY, DEFAULT_REPORT_INTERVAL};
use crate::types::{AlgorithmType, MiningConfiguration};
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the simulator
///
/// Everything has a default, so an empty file is a valid configuration.
/// Command-line flags override values read from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Payload the nonce is appended to
    #[serde(default = "default_block_data")]
    pub block_data: String,

    /// Required leading zero hex characters (clamped to 1..=8)
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,

    /// Digest algorithm ("sha256d" or "sha256")
    #[serde(default)]
    pub algorithm: AlgorithmType,

    /// Wall-clock limit for a run in seconds (0 = none)
    #[serde(default)]
    pub timeout_secs: u64,

    /// Engine reporting and scheduling settings
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Reporting and scheduling knobs of the mining engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Milliseconds between rate samples
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,

    /// Iterations between cooperative yields
    #[serde(default = "default_yield_interval")]
    pub yield_interval: u64,

    /// Informational journal entries kept per run
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

fn default_block_data() -> String {
    "Hello Bitcoin!".into()
}

fn default_difficulty() -> u32 {
    4
}

fn default_report_interval_ms() -> u64 {
    DEFAULT_REPORT_INTERVAL.as_millis() as u64
}

fn default_yield_interval() -> u64 {
    500
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            report_interval_ms: default_report_interval_ms(),
            yield_interval: default_yield_interval(),
            log_capacity: default_log_capacity(),
        }
    }
}

impl EngineSettings {
    /// Interval between rate samples
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    /// Rejects zero values, which would stall reporting or yielding
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.report_interval_ms == 0 {
            return Err(MinerError::ConfigError(
                "engine.report_interval_ms must be at least 1".into(),
            ));
        }
        if self.yield_interval == 0 {
            return Err(MinerError::ConfigError(
                "engine.yield_interval must be at least 1".into(),
            ));
        }
        if self.log_capacity == 0 {
            return Err(MinerError::ConfigError(
                "engine.log_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            block_data: default_block_data(),
            difficulty: default_difficulty(),
            algorithm: AlgorithmType::default(),
            timeout_secs: 0,
            engine: EngineSettings::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(MinerError)` - If file couldn't be read, parsed or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_str)
    }

    /// Parses and validates a TOML document
    pub fn from_toml(config_str: &str) -> Result<Self, MinerError> {
        let config: Config = toml::from_str(config_str)
            .map_err(|e| MinerError::ConfigError(format!("Invalid config format: {}", e)))?;

        config.engine.validate()?;
        Ok(config)
    }

    /// Run parameters with the difficulty clamped into range
    pub fn mining_configuration(&self) -> MiningConfiguration {
        MiningConfiguration::new(self.block_data.clone(), self.difficulty)
    }

    /// Optional wall-clock limit for a run
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Generates a commented configuration template
    ///
    /// The template parses back to [`Config::default`].
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# Proof-of-work simulator configuration\n\n");
        template.push_str("# Payload the nonce is appended to\n");
        template.push_str("block_data = \"Hello Bitcoin!\"\n");
        template.push_str("# Leading zero hex characters required (1-8)\n");
        template.push_str("difficulty = 4\n");
        template.push_str("# Supported algorithms: sha256d, sha256\n");
        template.push_str("algorithm = \"sha256d\"\n");
        template.push_str("# Stop the run after this many seconds (0 = never)\n");
        template.push_str("timeout_secs = 0\n\n");

        template.push_str("[engine]\n");
        template.push_str("# Milliseconds between hash rate samples\n");
        template.push_str("report_interval_ms = 2000\n");
        template.push_str("# Iterations between cooperative yields\n");
        template.push_str("yield_interval = 500\n");
        template.push_str("# Progress lines kept in the run journal\n");
        template.push_str("log_capacity = 10\n");

        template
    }
}
