// src/main.rs
use clap::Parser;
use crossbeam_channel::unbounded;
use env_logger::Target;
use log::LevelFilter;
use pow_sim_rs::miner::{self, MiningEngine, SearchSnapshot};
use pow_sim_rs::stats::format_optional_rate;
use pow_sim_rs::{cli, config, stats, utils, *};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Main entry point
///
/// Parses the command line and delegates to the subcommand handler.
fn main() -> Result<(), MinerError> {
    let cli = cli::Commands::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    match cli.action {
        cli::Action::Hash(opts) => show_digest_pair(opts),
        cli::Action::Mine(opts) => start_mining(opts, level),
        cli::Action::Verify(opts) => verify_proof(opts, level),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Prints both passes of the double hash
fn show_digest_pair(opts: cli::HashOptions) -> Result<(), MinerError> {
    let pair = compute_digest_pair(&opts.text);

    println!("Input:       {:?}", opts.text);
    println!("First pass:  {}", pair.first_pass.as_deref().unwrap_or("-"));
    println!("Second pass: {}", pair.second_pass.as_deref().unwrap_or("-"));
    Ok(())
}

/// Runs one mining search
///
/// # Operations
/// 1. Loads configuration and applies CLI overrides
/// 2. Spawns the event reporter
/// 3. Starts the engine on a tokio runtime
/// 4. Stops the run on Ctrl-C or when the time limit expires
/// 5. Prints the final state
fn start_mining(opts: cli::MineOptions, level: LevelFilter) -> Result<(), MinerError> {
    // stdout carries only the snapshot in JSON mode
    let target = if opts.json {
        Target::Stderr
    } else {
        Target::Stdout
    };
    utils::init_logging(level, target);

    let mut config = match &opts.config {
        Some(path) => config::load(path)?,
        None => config::Config::default(),
    };
    if let Some(data) = opts.data {
        config.block_data = data;
    }
    if let Some(difficulty) = opts.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(algo) = opts.algorithm {
        config.algorithm = algo;
    }
    if let Some(timeout) = opts.timeout {
        config.timeout_secs = timeout;
    }
    config.engine.validate()?;

    let (event_sender, event_receiver) = unbounded();
    let reporter = stats::StatsReporter::spawn(event_receiver);

    let rt = Runtime::new()?;
    let snapshot = rt.block_on(async {
        let engine = Arc::new(MiningEngine::new(
            create_algorithm(config.algorithm),
            event_sender,
            config.engine.clone(),
        ));
        let preview = preview_digest_pair(&config.block_data).await;
        if let Some(digest) = preview.second_pass {
            log::debug!("Block data double hash: {}", digest);
        }
        engine.start(config.mining_configuration());

        let canceller = tokio::spawn(cancel_on_signal(engine.clone(), config.timeout()));
        let snapshot = engine.wait().await;
        canceller.abort();
        snapshot
    })?;
    // Dropping the runtime drops the last engine handle and closes the channel
    drop(rt);
    let summary = reporter.join()?;
    log::debug!("Reporter saw {} progress samples", summary.progress_reports);

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

/// Calls `stop()` on Ctrl-C or after `timeout`
async fn cancel_on_signal(engine: Arc<MiningEngine>, timeout: Option<Duration>) {
    let deadline = async {
        match timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => log::warn!("Interrupted, stopping the run"),
        _ = deadline => log::warn!("Time limit reached, stopping the run"),
    }
    engine.stop();
}

/// Human-readable rendering of the final state
fn print_snapshot(snapshot: &SearchSnapshot) {
    println!();
    for entry in &snapshot.log {
        println!("  {}", entry);
    }
    println!();
    println!("State:  {}", snapshot.state);
    println!("Nonce:  {}", snapshot.nonce);
    println!("Rate:   {}", format_optional_rate(snapshot.current_rate));
    if let Some(result) = &snapshot.result {
        println!("Proof:  nonce {} -> {}", result.nonce, result.digest_hex);
    }
}

/// Checks a claimed proof
///
/// # Errors
/// `MinerError::InputError` if the claimed digest is not hex or does not match
fn verify_proof(opts: cli::VerifyOptions, level: LevelFilter) -> Result<(), MinerError> {
    utils::init_logging(level, Target::Stdout);

    let config = MiningConfiguration::new(opts.data, opts.difficulty);
    let algorithm = create_algorithm(opts.algorithm);
    let check = miner::check_proof(algorithm.as_ref(), &config, opts.nonce)?;

    if let Some(claimed) = opts.digest {
        let claimed = hex::decode(claimed.trim())?;
        if claimed.as_slice() != check.digest.as_slice() {
            return Err(MinerError::InputError(format!(
                "Claimed digest does not match, expected {}",
                check.digest_hex
            )));
        }
    }

    println!("Message: {:?}", miner::candidate_message(&config.block_data, opts.nonce));
    println!("Digest:  {}", check.digest_hex);
    println!("Zeros:   {}", check.leading_zeros);
    println!(
        "Target:  {} ({})",
        config.target_prefix(),
        if check.valid { "met" } else { "not met" }
    );
    Ok(())
}

/// Writes the configuration template
fn generate_config(opts: cli::ConfigOptions) -> Result<(), MinerError> {
    let template = config::generate_template();
    std::fs::write(&opts.output, template)?;
    println!("Configuration template written to {}", opts.output.display());
    Ok(())
}
