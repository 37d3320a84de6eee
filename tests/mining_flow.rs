//! End-to-end mining flow through the public API

use crossbeam_channel::unbounded;
use pow_sim_rs::{
    AlgorithmType, Config, EngineSettings, LogKind, MiningConfiguration, MiningEngine,
    MiningEvent, MiningState, StatsReporter, compute_digest_pair, create_algorithm, hash_once,
    hash_twice,
};
use std::time::Duration;

fn first_hit(data: &str, zeros: usize, hash: fn(&[u8]) -> String) -> (u64, String) {
    let prefix = "0".repeat(zeros);
    (0u64..)
        .map(|n| (n, hash(format!("{}{}", data, n).as_bytes())))
        .find(|(_, digest)| digest.starts_with(&prefix))
        .unwrap()
}

#[tokio::test]
async fn mines_configured_block_and_reports() {
    let config = Config::from_toml("block_data = \"test\"\ndifficulty = 2\n").unwrap();
    let (tx, rx) = unbounded();
    let reporter = StatsReporter::spawn(rx);

    let engine = MiningEngine::new(create_algorithm(config.algorithm), tx, config.engine.clone());
    assert!(engine.start(config.mining_configuration()));
    let snapshot = engine.wait().await.unwrap();
    drop(engine);

    let (nonce, digest) = first_hit("test", 2, hash_twice);
    assert_eq!(snapshot.state, MiningState::Found);
    let result = snapshot.result.clone().unwrap();
    assert_eq!((result.nonce, result.digest_hex.as_str()), (nonce, digest.as_str()));
    assert_eq!(snapshot.log.last().unwrap().kind, LogKind::Success);

    let summary = reporter.join().unwrap();
    assert_eq!(summary.runs_started, 1);
    assert_eq!(summary.result, Some(result));
}

#[tokio::test]
async fn single_sha256_variant_searches_linearly() {
    let (tx, _rx) = unbounded();
    let engine = MiningEngine::new(
        create_algorithm(AlgorithmType::Sha256),
        tx,
        EngineSettings::default(),
    );

    engine.start(MiningConfiguration::new("script", 2));
    let snapshot = engine.wait().await.unwrap();

    let (nonce, digest) = first_hit("script", 2, hash_once);
    let result = snapshot.result.clone().unwrap();
    assert_eq!(result.nonce, nonce);
    assert_eq!(result.digest_hex, digest);
}

#[tokio::test]
async fn time_limit_acts_as_stop() {
    let (tx, rx) = unbounded();
    let engine = std::sync::Arc::new(MiningEngine::new(
        create_algorithm(AlgorithmType::Sha256d),
        tx,
        EngineSettings::default(),
    ));
    engine.start(MiningConfiguration::new("never", 8));

    let canceller = {
        let engine = engine.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            engine.stop();
        })
    };

    let snapshot = engine.wait().await.unwrap();
    canceller.await.unwrap();

    assert_eq!(snapshot.state, MiningState::Stopped);
    assert!(snapshot.result.is_none());
    assert!(rx.try_iter().any(|e| matches!(e, MiningEvent::Stopped { .. })));
}

#[test]
fn preview_pair_matches_double_hash() {
    let pair = compute_digest_pair("Hello Bitcoin!");
    assert_eq!(pair.second_pass.as_deref(), Some(hash_twice(b"Hello Bitcoin!").as_str()));
    assert_eq!(pair.first_pass.as_deref(), Some(hash_once(b"Hello Bitcoin!").as_str()));
    assert!(compute_digest_pair("").first_pass.is_none());
}
