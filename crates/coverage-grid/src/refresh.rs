//! Back-off bookkeeping for reloading a dataset's grid metadata.

use std::fmt::Display;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::CoverageConfig;

/// Tracks refresh attempts for one dataset.
///
/// After a failure the next attempt waits `2^failures` seconds, capped at
/// `max_backoff_secs`. A success clears the failure count. A loaded
/// dataset is reloaded once `update_interval_secs` has passed since the
/// last success; without an interval it is never reloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshState {
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    max_backoff_secs: u64,
    #[serde(default)]
    update_interval_secs: Option<u64>,
}

impl RefreshState {
    pub fn new(max_backoff_secs: u64) -> Self {
        Self {
            last_success: None,
            last_failure: None,
            consecutive_failures: 0,
            max_backoff_secs,
            update_interval_secs: None,
        }
    }

    pub fn from_config(config: &CoverageConfig) -> Self {
        Self {
            update_interval_secs: config.refresh_update_interval_secs,
            ..Self::new(config.refresh_max_backoff_secs)
        }
    }

    /// Reload a loaded dataset every `secs` seconds.
    pub fn with_update_interval(mut self, secs: u64) -> Self {
        self.update_interval_secs = Some(secs);
        self
    }

    pub fn update_interval(&self) -> Option<Duration> {
        self.update_interval_secs
            .map(|secs| Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)))
    }

    /// Delay before the next attempt after the current run of failures.
    pub fn backoff(&self) -> Duration {
        let secs = 1u64
            .checked_shl(self.consecutive_failures)
            .unwrap_or(u64::MAX)
            .min(self.max_backoff_secs);
        Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    /// Whether a reload should be attempted at `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        if let (Some(failed_at), true) = (self.last_failure, self.consecutive_failures > 0) {
            return now > failed_at + self.backoff();
        }
        match (self.last_success, self.update_interval()) {
            (None, _) => true,
            (Some(loaded_at), Some(interval)) => now > loaded_at + interval,
            (Some(_), None) => false,
        }
    }

    pub fn record_success(&mut self, now: DateTime<Utc>) {
        if self.consecutive_failures > 0 {
            info!(
                failures = self.consecutive_failures,
                "Refresh succeeded after earlier failures"
            );
        }
        self.last_success = Some(now);
        self.consecutive_failures = 0;
    }

    pub fn record_failure(&mut self, now: DateTime<Utc>, error: &impl Display) {
        self.last_failure = Some(now);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        warn!(
            error = %error,
            failures = self.consecutive_failures,
            retry_in_secs = self.backoff().num_seconds(),
            "Refresh failed, backing off"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_never_loaded_needs_refresh() {
        let state = RefreshState::new(600);
        assert!(state.needs_refresh(t0()));
    }

    #[test]
    fn test_success_stops_refresh() {
        let mut state = RefreshState::new(600);
        state.record_success(t0());
        assert!(!state.needs_refresh(t0() + Duration::hours(1)));
    }

    #[test]
    fn test_loaded_dataset_is_due_after_update_interval() {
        let mut state = RefreshState::new(600).with_update_interval(3600);
        state.record_success(t0());
        assert!(!state.needs_refresh(t0() + Duration::minutes(30)));
        assert!(!state.needs_refresh(t0() + Duration::hours(1)));
        assert!(state.needs_refresh(t0() + Duration::hours(1) + Duration::seconds(1)));

        // Reloading restarts the interval
        state.record_success(t0() + Duration::hours(2));
        assert!(!state.needs_refresh(t0() + Duration::hours(2) + Duration::minutes(59)));
    }

    #[test]
    fn test_failure_backoff_takes_precedence_over_interval() {
        let mut state = RefreshState::new(600).with_update_interval(10);
        state.record_success(t0());
        state.record_failure(t0() + Duration::seconds(20), &"boom");
        assert!(!state.needs_refresh(t0() + Duration::seconds(21)));
        assert!(state.needs_refresh(t0() + Duration::seconds(23)));
    }

    #[test]
    fn test_interval_from_config() {
        let config = CoverageConfig {
            refresh_update_interval_secs: Some(60),
            ..CoverageConfig::default()
        };
        let state = RefreshState::from_config(&config);
        assert_eq!(state.update_interval(), Some(Duration::seconds(60)));
        assert_eq!(RefreshState::new(600).update_interval(), None);
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let mut state = RefreshState::new(600);
        let expected = [2, 4, 8, 16, 32, 64, 128, 256, 512, 600, 600];
        for secs in expected {
            state.record_failure(t0(), &"boom");
            assert_eq!(state.backoff(), Duration::seconds(secs));
        }
        state.consecutive_failures = 200;
        assert_eq!(state.backoff(), Duration::seconds(600));
    }

    #[test]
    fn test_waits_out_backoff() {
        let mut state = RefreshState::new(600);
        state.record_failure(t0(), &"boom");
        state.record_failure(t0(), &"boom");
        assert!(!state.needs_refresh(t0() + Duration::seconds(4)));
        assert!(state.needs_refresh(t0() + Duration::seconds(5)));
    }

    #[test]
    fn test_success_resets_failures() {
        let mut state = RefreshState::new(600);
        state.record_failure(t0(), &"boom");
        state.record_success(t0() + Duration::seconds(10));
        assert_eq!(state.consecutive_failures, 0);
        assert_eq!(state.backoff(), Duration::seconds(1));
        assert!(!state.needs_refresh(t0() + Duration::seconds(20)));
    }
}
