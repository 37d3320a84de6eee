//! Statistics: hash rate sampling, the run journal and event reporting
//!
//! The engine owns a [`RateTracker`] and a [`Journal`] per run. The
//! [`StatsReporter`] sits on the observer side and folds engine events
//! into a [`ReportSummary`].

/// Bounded, append-only run journal
pub mod journal;

/// Hash rate sampling and human-scaled formatting
pub mod rate;

/// Background consumer of engine events
pub mod reporter;

// Re-export main components
pub use journal::{DEFAULT_LOG_CAPACITY, Journal};
pub use rate::{DEFAULT_REPORT_INTERVAL, RateTracker, format_optional_rate, format_rate};
pub use reporter::{ReportSummary, StatsReporter};
