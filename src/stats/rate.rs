// src/stats/rate.rs
//! Hash rate sampling and formatting

use std::time::{Duration, Instant};

/// Default wall-clock interval between rate samples
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(2000);

/// Renders a rate with two decimals in H/s, kH/s or MH/s
pub fn format_rate(hashes_per_second: f64) -> String {
    if hashes_per_second < 1_000.0 {
        format!("{:.2} H/s", hashes_per_second)
    } else if hashes_per_second < 1_000_000.0 {
        format!("{:.2} kH/s", hashes_per_second / 1_000.0)
    } else {
        format!("{:.2} MH/s", hashes_per_second / 1_000_000.0)
    }
}

/// Renders an optional rate, `None` meaning no sample was taken yet
pub fn format_optional_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format_rate(rate),
        None => "unknown".to_string(),
    }
}

/// Tracks attempts between periodic rate samples
///
/// The rate is `(nonce - nonce_at_last_report) / seconds_since_last_report`
/// and is only computed once the interval has been exceeded.
#[derive(Debug, Clone)]
pub struct RateTracker {
    interval: Duration,
    last_report_time: Instant,
    last_report_nonce: u64,
}

impl RateTracker {
    /// Starts tracking at `now` with nonce 0
    pub fn new(interval: Duration, now: Instant) -> Self {
        RateTracker {
            interval,
            last_report_time: now,
            last_report_nonce: 0,
        }
    }

    /// Takes a sample if the interval has been exceeded
    ///
    /// # Returns
    /// The rate in hashes per second, or `None` if no sample is due yet
    pub fn sample(&mut self, now: Instant, nonce: u64) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.last_report_time);
        if elapsed <= self.interval || elapsed.is_zero() {
            return None;
        }

        let attempts = nonce.saturating_sub(self.last_report_nonce);
        let rate = attempts as f64 / elapsed.as_secs_f64();

        self.last_report_time = now;
        self.last_report_nonce = nonce;
        Some(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate_thresholds() {
        assert_eq!(format_rate(500.0), "500.00 H/s");
        assert_eq!(format_rate(1500.0), "1.50 kH/s");
        assert_eq!(format_rate(2_500_000.0), "2.50 MH/s");
        assert_eq!(format_rate(0.0), "0.00 H/s");
        assert_eq!(format_rate(999.994), "999.99 H/s");
        assert_eq!(format_rate(1_000.0), "1.00 kH/s");
        assert_eq!(format_rate(1_000_000.0), "1.00 MH/s");
    }

    #[test]
    fn test_format_optional_rate() {
        assert_eq!(format_optional_rate(None), "unknown");
        assert_eq!(format_optional_rate(Some(12.0)), "12.00 H/s");
    }

    #[test]
    fn test_sample_waits_for_interval() {
        let t0 = Instant::now();
        let mut tracker = RateTracker::new(Duration::from_millis(2000), t0);

        assert_eq!(tracker.sample(t0 + Duration::from_millis(1999), 100), None);
        assert_eq!(tracker.sample(t0 + Duration::from_millis(2000), 100), None);

        // Nothing was consumed by the early calls
        let t1 = t0 + Duration::from_millis(2500);
        let rate = tracker.sample(t1, 5_000).unwrap();
        assert!((rate - 2_000.0).abs() < 1e-6);

        // The next window starts at t1
        assert_eq!(tracker.sample(t1 + Duration::from_millis(2000), 9_000), None);
    }

    #[test]
    fn test_sample_uses_delta_since_last_report() {
        let t0 = Instant::now();
        let mut tracker = RateTracker::new(Duration::from_secs(1), t0);

        tracker.sample(t0 + Duration::from_secs(2), 10_000).unwrap();
        let rate = tracker.sample(t0 + Duration::from_secs(4), 14_000).unwrap();
        assert!((rate - 2_000.0).abs() < 1e-6);
    }
}
