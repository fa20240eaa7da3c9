//! Cooperative time budget for search drivers.
//!
//! Drivers never interrupt a candidate mid-evaluation. They poll the budget
//! every `poll_interval` candidates, so the count of tested candidates at
//! the moment a run stops is exact.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Limits applied to a single search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Wall-clock budget in seconds. None = unlimited.
    pub time_limit_secs: Option<f64>,
    /// Candidates tested between two budget checks.
    pub poll_interval: u64,
    /// Worker threads for parallel drivers. None = rayon's default.
    pub threads: Option<usize>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            time_limit_secs: None,
            poll_interval: 1024,
            threads: None,
        }
    }
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_time_limit(secs: f64) -> Self {
        Self {
            time_limit_secs: Some(secs),
            ..Self::default()
        }
    }

    /// The limit as a `Duration`. A negative or non-finite value cannot be
    /// honored; it is logged and treated as no limit.
    pub fn time_limit(&self) -> Option<Duration> {
        let secs = self.time_limit_secs?;
        match Duration::try_from_secs_f64(secs) {
            Ok(limit) => Some(limit),
            Err(_) => {
                warn!(time_limit_secs = secs, "ignoring invalid time limit");
                None
            }
        }
    }
}

/// Reason a search run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every candidate in the space was tested.
    Completed,
    /// The wall-clock budget ran out first.
    TimeLimitReached,
}

/// Tracks elapsed time against an optional limit.
#[derive(Debug, Clone)]
pub struct TimeBudget {
    start: Instant,
    limit: Option<Duration>,
    poll_interval: u64,
}

impl TimeBudget {
    pub fn start(limits: &SearchLimits) -> Self {
        Self {
            start: Instant::now(),
            limit: limits.time_limit(),
            poll_interval: limits.poll_interval.max(1),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// True once the limit has passed. Always false without a limit.
    pub fn exceeded(&self) -> bool {
        self.limit.is_some_and(|limit| self.start.elapsed() >= limit)
    }

    /// Check the clock only when `tested` lands on a poll boundary.
    pub fn poll(&self, tested: u64) -> bool {
        self.limit.is_some() && tested % self.poll_interval == 0 && self.exceeded()
    }

    pub fn poll_interval(&self) -> u64 {
        self.poll_interval
    }
}
