// src/miner/engine.rs
//! Mining engine
//!
//! Drives a [`Search`] on a tokio task with cooperative scheduling. The task
//! yields every `yield_interval` iterations and checks the stop flag before
//! every iteration, so a `stop()` is honoured within one yield interval.
//! Observers poll [`MiningEngine::snapshot`] or read [`MiningEvent`]s from
//! the channel handed to [`MiningEngine::new`].

use crate::config::EngineSettings;
use crate::miner::algorithm::Algorithm;
use crate::miner::search::{ProgressReport, Search, SearchSnapshot};
use crate::types::{MiningConfiguration, MiningResult};
use crate::utils::error::MinerError;
use arc_swap::ArcSwap;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::task::JoinHandle;

/// Notifications emitted by the engine, in order
#[derive(Debug, Clone, PartialEq)]
pub enum MiningEvent {
    /// A run began with this configuration
    Started(MiningConfiguration),
    /// Periodic rate and latest-attempt sample
    Progress(ProgressReport),
    /// The run found a qualifying digest
    Found(MiningResult),
    /// The run was cancelled
    Stopped {
        /// Nonce that would have been tested next
        nonce: u64,
    },
    /// The digest primitive failed and the run was aborted
    Failed {
        /// Nonce being tested when the failure occurred
        nonce: u64,
        /// Error description
        reason: String,
    },
}

/// State shared between the engine handle and its search task
struct Shared {
    /// Set while a run is active; guards against concurrent runs
    running: AtomicBool,
    /// Cancellation flag of the active run, `None` while idle
    cancel: ArcSwap<Option<Arc<AtomicBool>>>,
    /// Latest published view of the search
    snapshot: ArcSwap<SearchSnapshot>,
}

/// Clears `running` if the search task ends without finishing normally
struct RunGuard {
    shared: Arc<Shared>,
    armed: bool,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.armed {
            self.shared.cancel.store(Arc::new(None));
            self.shared.running.store(false, Ordering::SeqCst);
        }
    }
}

/// Single-worker proof-of-work search engine
pub struct MiningEngine {
    /// State shared with the search task
    shared: Arc<Shared>,
    /// Digest used for every candidate
    algorithm: Arc<dyn Algorithm>,
    /// Channel for progress and terminal events
    event_sender: Sender<MiningEvent>,
    /// Reporting and scheduling knobs
    settings: EngineSettings,
    /// Handle of the active (or last) search task
    task: Mutex<Option<JoinHandle<()>>>,
}

impl MiningEngine {
    /// Creates an idle engine
    ///
    /// # Arguments
    /// * `algorithm` - Digest to mine with
    /// * `event_sender` - Channel receiving [`MiningEvent`]s
    /// * `settings` - Report interval, yield cadence and journal size
    pub fn new(
        algorithm: Arc<dyn Algorithm>,
        event_sender: Sender<MiningEvent>,
        settings: EngineSettings,
    ) -> Self {
        MiningEngine {
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                cancel: ArcSwap::from_pointee(None),
                snapshot: ArcSwap::from_pointee(SearchSnapshot::default()),
            }),
            algorithm,
            event_sender,
            settings,
            task: Mutex::new(None),
        }
    }

    /// Starts a new run
    ///
    /// Ignored while a run is active; the active run keeps its progress.
    /// Otherwise the nonce restarts at 0 and the result and journal are
    /// cleared.
    ///
    /// # Returns
    /// `true` if a run was started
    ///
    /// # Panics
    /// Must be called from within a tokio runtime.
    pub fn start(&self, config: MiningConfiguration) -> bool {
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("Start ignored, a run is already active");
            return false;
        }

        let cancel = Arc::new(AtomicBool::new(false));
        self.shared.cancel.store(Arc::new(Some(cancel.clone())));

        let search = Search::new(
            config.clone(),
            self.algorithm.clone(),
            &self.settings,
            Instant::now(),
        );
        self.shared.snapshot.store(Arc::new(search.snapshot()));

        log::info!(
            "Mining started: difficulty {} ({}), target prefix {}, data {:?}",
            config.difficulty_zeros,
            self.algorithm.algorithm_type(),
            config.target_prefix(),
            config.block_data
        );
        let _ = self.event_sender.send(MiningEvent::Started(config));

        let handle = tokio::spawn(run_search(
            search,
            cancel,
            self.shared.clone(),
            self.event_sender.clone(),
            self.settings.yield_interval.max(1),
        ));
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        true
    }

    /// Requests cancellation of the active run
    ///
    /// Takes effect at the next iteration boundary of the search task. The
    /// request is bound to the run active when it is made and never carries
    /// over to a later run.
    ///
    /// # Returns
    /// `false` if no run was active
    pub fn stop(&self) -> bool {
        match &**self.shared.cancel.load() {
            Some(cancel) => {
                cancel.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Latest published view of the search
    pub fn snapshot(&self) -> Arc<SearchSnapshot> {
        self.shared.snapshot.load_full()
    }

    /// Waits for the current run to end
    ///
    /// Returns immediately with the current snapshot if nothing is running.
    ///
    /// # Errors
    /// `MinerError::TaskError` if the search task panicked
    pub async fn wait(&self) -> Result<Arc<SearchSnapshot>, MinerError> {
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            handle.await?;
        }

        Ok(self.snapshot())
    }
}

/// The search task: iterate, report, yield, until found, stopped or failed
async fn run_search(
    mut search: Search,
    cancel: Arc<AtomicBool>,
    shared: Arc<Shared>,
    events: Sender<MiningEvent>,
    yield_interval: u64,
) {
    let mut guard = RunGuard {
        shared: shared.clone(),
        armed: true,
    };
    let mut since_yield = 0u64;

    let terminal = loop {
        if cancel.load(Ordering::SeqCst) {
            search.stop();
            log::info!("Mining stopped by user at nonce {}", search.nonce());
            break MiningEvent::Stopped {
                nonce: search.nonce(),
            };
        }

        match search.step(Instant::now()) {
            Ok(iteration) => {
                if let Some(report) = iteration.report {
                    log::debug!(
                        "Rate: {} | Nonce: {} | Hash: {}",
                        crate::stats::format_rate(report.rate),
                        report.nonce,
                        report.digest_hex
                    );
                    shared.snapshot.store(Arc::new(search.snapshot()));
                    let _ = events.send(MiningEvent::Progress(report));
                }

                if let Some(result) = iteration.result {
                    log::info!(
                        "Block mined at nonce {} with hash {}",
                        result.nonce,
                        result.digest_hex
                    );
                    break MiningEvent::Found(result);
                }
            }
            Err(e) => {
                log::error!("Digest failed at nonce {}: {}", search.nonce(), e);
                search.fail(&e);
                break MiningEvent::Failed {
                    nonce: search.nonce(),
                    reason: e.to_string(),
                };
            }
        }

        since_yield += 1;
        if since_yield >= yield_interval {
            since_yield = 0;
            shared.snapshot.store(Arc::new(search.snapshot()));
            tokio::task::yield_now().await;
        }
    };

    // Publish the terminal view before anyone can observe the run as over
    shared.snapshot.store(Arc::new(search.snapshot()));
    guard.armed = false;
    shared.cancel.store(Arc::new(None));
    shared.running.store(false, Ordering::SeqCst);
    let _ = events.send(terminal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::algorithm::{DoubleSha256, hash_twice};
    use crate::types::{AlgorithmType, LogKind, MiningState};
    use crossbeam_channel::{Receiver, unbounded};

    /// Digest that fails after a number of successful calls
    struct BrokenDigest {
        fail_after: usize,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl Algorithm for BrokenDigest {
        fn digest(&self, input: &[u8]) -> Result<[u8; 32], MinerError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.fail_after {
                return Err(MinerError::AlgorithmError("primitive unavailable".into()));
            }
            DoubleSha256.digest(input)
        }

        fn algorithm_type(&self) -> AlgorithmType {
            AlgorithmType::Sha256d
        }
    }

    fn engine() -> (MiningEngine, Receiver<MiningEvent>) {
        let (tx, rx) = unbounded();
        let engine = MiningEngine::new(Arc::new(DoubleSha256), tx, EngineSettings::default());
        (engine, rx)
    }

    fn scan(data: &str, zeros: u32) -> (u64, String) {
        let prefix = "0".repeat(zeros as usize);
        (0u64..)
            .map(|n| (n, hash_twice(format!("{}{}", data, n).as_bytes())))
            .find(|(_, h)| h.starts_with(&prefix))
            .unwrap()
    }

    #[tokio::test]
    async fn test_finds_same_nonce_as_linear_scan() {
        let (engine, rx) = engine();
        assert!(engine.start(MiningConfiguration::new("test", 1)));

        let snapshot = engine.wait().await.unwrap();
        let (nonce, digest) = scan("test", 1);

        assert_eq!(snapshot.state, MiningState::Found);
        let result = snapshot.result.clone().unwrap();
        assert_eq!(result.nonce, nonce);
        assert_eq!(result.digest_hex, digest);
        assert!(!engine.stop());

        let events: Vec<_> = rx.try_iter().collect();
        assert!(matches!(events.first(), Some(MiningEvent::Started(_))));
        assert_eq!(events.last(), Some(&MiningEvent::Found(result)));
    }

    #[tokio::test]
    async fn test_stop_right_after_start() {
        let (engine, rx) = engine();
        assert!(engine.start(MiningConfiguration::new("stop me", 8)));
        assert!(engine.stop());

        let snapshot = engine.wait().await.unwrap();
        assert_eq!(snapshot.state, MiningState::Stopped);
        assert!(snapshot.result.is_none());
        assert!(snapshot.nonce <= EngineSettings::default().yield_interval);
        assert_eq!(snapshot.current_rate, Some(0.0));
        assert_eq!(snapshot.log.last().map(|e| e.kind), Some(LogKind::Stopped));

        let events: Vec<_> = rx.try_iter().collect();
        assert!(matches!(events.last(), Some(MiningEvent::Stopped { .. })));
        assert!(!events.iter().any(|e| matches!(e, MiningEvent::Found(_))));
    }

    #[tokio::test]
    async fn test_second_start_is_ignored_while_running() {
        let (engine, _rx) = engine();
        let first = MiningConfiguration::new("first", 8);
        assert!(engine.start(first.clone()));
        assert!(!engine.start(MiningConfiguration::new("second", 1)));

        assert_eq!(engine.snapshot().config.as_ref(), Some(&first));

        engine.stop();
        let snapshot = engine.wait().await.unwrap();
        assert_eq!(snapshot.config, Some(first));
        assert_eq!(snapshot.state, MiningState::Stopped);
    }

    #[tokio::test]
    async fn test_restart_after_completion_resets_run() {
        let (engine, _rx) = engine();
        engine.start(MiningConfiguration::new("one", 8));
        engine.stop();
        engine.wait().await.unwrap();

        assert!(engine.start(MiningConfiguration::new("test", 1)));
        let snapshot = engine.wait().await.unwrap();

        assert_eq!(snapshot.state, MiningState::Found);
        assert_eq!(snapshot.result.as_ref().map(|r| r.nonce), Some(scan("test", 1).0));
        assert!(snapshot.log.iter().all(|e| e.kind != LogKind::Stopped));
    }

    #[tokio::test]
    async fn test_late_stop_does_not_cancel_next_run() {
        let (engine, _rx) = engine();
        engine.start(MiningConfiguration::new("old", 8));
        let old_cancel = engine.shared.cancel.load_full();
        engine.stop();
        engine.wait().await.unwrap();
        assert!(!engine.stop());

        // A stop aimed at the old run lands after the next run started
        assert!(engine.start(MiningConfiguration::new("test", 3)));
        if let Some(cancel) = &*old_cancel {
            cancel.store(true, Ordering::SeqCst);
        }

        let snapshot = engine.wait().await.unwrap();
        assert_eq!(snapshot.state, MiningState::Found);
        assert_eq!(snapshot.result.as_ref().map(|r| r.nonce), Some(scan("test", 3).0));
    }

    #[tokio::test]
    async fn test_stop_while_idle_is_ignored() {
        let (engine, rx) = engine();
        assert!(!engine.stop());
        assert_eq!(engine.snapshot().state, MiningState::Idle);

        let snapshot = engine.wait().await.unwrap();
        assert_eq!(snapshot.state, MiningState::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_digest_failure_stops_run() {
        let (tx, rx) = unbounded();
        let algorithm = Arc::new(BrokenDigest {
            fail_after: 3,
            calls: Default::default(),
        });
        let engine = MiningEngine::new(algorithm, tx, EngineSettings::default());

        engine.start(MiningConfiguration::new("broken", 8));
        let snapshot = engine.wait().await.unwrap();

        assert_eq!(snapshot.state, MiningState::Stopped);
        assert_eq!(snapshot.nonce, 3);
        assert!(snapshot.result.is_none());
        let last = snapshot.log.last().unwrap();
        assert_eq!(last.kind, LogKind::Failure);
        assert!(last.message.contains("primitive unavailable"));

        let failed = rx.try_iter().last().unwrap();
        assert!(matches!(failed, MiningEvent::Failed { nonce: 3, .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_progress_reports_while_running() {
        let (tx, rx) = unbounded();
        let settings = EngineSettings {
            report_interval_ms: 10,
            ..EngineSettings::default()
        };
        let engine = MiningEngine::new(Arc::new(DoubleSha256), tx, settings);
        engine.start(MiningConfiguration::new("progress", 8));

        let report = tokio::task::spawn_blocking(move || {
            rx.iter().find_map(|event| match event {
                MiningEvent::Progress(report) => Some(report),
                _ => None,
            })
        })
        .await
        .unwrap()
        .unwrap();

        assert!(report.rate >= 0.0);
        assert_eq!(report.digest_hex.len(), 64);

        assert!(engine.stop());
        let snapshot = engine.wait().await.unwrap();
        assert_eq!(snapshot.state, MiningState::Stopped);
        assert!(snapshot.nonce >= report.nonce);
        assert!(snapshot.log.iter().any(|e| e.kind == LogKind::Info));
        assert!(snapshot.log.iter().filter(|e| e.kind == LogKind::Info).count() <= 10);
    }
}
