// src/stats/reporter.rs
use crate::miner::MiningEvent;
use crate::stats::rate::format_rate;
use crate::types::MiningResult;
use crate::utils::error::MinerError;
use crossbeam_channel::Receiver;
use std::thread::JoinHandle;

/// What the reporter saw over the lifetime of the event channel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    /// Number of runs started
    pub runs_started: u64,
    /// Number of progress samples received
    pub progress_reports: u64,
    /// Most recent sampled rate
    pub last_rate: Option<f64>,
    /// Proof of the last successful run
    pub result: Option<MiningResult>,
    /// Whether the last run ended by cancellation or failure
    pub stopped: bool,
}

impl ReportSummary {
    /// Folds one event into the summary
    ///
    /// Progress samples are logged at `info`; the engine already logs the
    /// lifecycle events themselves.
    pub fn record(&mut self, event: &MiningEvent) {
        match event {
            MiningEvent::Started(config) => {
                self.runs_started += 1;
                self.result = None;
                self.stopped = false;
                log::debug!(
                    "Searching for {} leading zeros (~{} attempts expected)",
                    config.difficulty_zeros,
                    config.expected_attempts()
                );
            }
            MiningEvent::Progress(report) => {
                self.progress_reports += 1;
                self.last_rate = Some(report.rate);
                log::info!(
                    "Rate: {} | Nonce: {} | Hash: {}",
                    format_rate(report.rate),
                    report.nonce,
                    report.digest_hex
                );
            }
            MiningEvent::Found(result) => {
                self.result = Some(result.clone());
                log::debug!("Result received for nonce {}", result.nonce);
            }
            MiningEvent::Stopped { nonce } => {
                self.stopped = true;
                self.last_rate = Some(0.0);
                log::debug!("Stop received at nonce {}", nonce);
            }
            MiningEvent::Failed { nonce, reason } => {
                self.stopped = true;
                self.last_rate = Some(0.0);
                log::debug!("Failure received at nonce {}: {}", nonce, reason);
            }
        }
    }
}

/// Consumes engine events on a background thread
///
/// The thread ends when every sender of the channel has been dropped,
/// i.e. when the engine is dropped.
pub struct StatsReporter {
    handle: JoinHandle<ReportSummary>,
}

impl StatsReporter {
    /// Starts listening on `receiver`
    pub fn spawn(receiver: Receiver<MiningEvent>) -> Self {
        let handle = std::thread::spawn(move || {
            let mut summary = ReportSummary::default();
            for event in receiver {
                summary.record(&event);
            }
            summary
        });

        StatsReporter { handle }
    }

    /// Waits for the channel to close and returns the summary
    pub fn join(self) -> Result<ReportSummary, MinerError> {
        self.handle
            .join()
            .map_err(|_| MinerError::TaskError("Reporter thread panicked".into()))
    }
}
