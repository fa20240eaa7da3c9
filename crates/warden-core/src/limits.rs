//! Run limits shared by every policy in a batch.

use serde::{Deserialize, Serialize};
use warden_explore::budget::SearchLimits;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("Invalid time limit {0}: expected a finite number of seconds >= 0")]
pub struct InvalidTimeLimit(pub f64);

/// Limits for the search drivers of a single policy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunLimits {
    /// Wall-clock seconds per brute-force run. None = unlimited.
    pub time_limit_secs: Option<f64>,
    /// Candidates tested between two clock checks.
    pub poll_interval: u64,
    /// Worker threads for parallel drivers. None = rayon default.
    pub threads: Option<usize>,
    /// Use the parallel drivers.
    pub parallel: bool,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            time_limit_secs: None,
            poll_interval: 1024,
            threads: None,
            parallel: false,
        }
    }
}

impl RunLimits {
    /// The time limit, if set, must be a finite number of seconds >= 0.
    pub fn validate(&self) -> Result<(), InvalidTimeLimit> {
        match self.time_limit_secs {
            Some(secs) if !(secs.is_finite() && secs >= 0.0) => Err(InvalidTimeLimit(secs)),
            _ => Ok(()),
        }
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            time_limit_secs: self.time_limit_secs,
            poll_interval: self.poll_interval,
            threads: self.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = RunLimits::default();
        assert_eq!(limits.time_limit_secs, None);
        assert_eq!(limits.poll_interval, 1024);
        assert!(!limits.parallel);
        assert_eq!(limits.search_limits(), SearchLimits::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let limits: RunLimits = serde_json::from_str(r#"{"time_limit_secs": 2.5}"#).unwrap();
        assert_eq!(limits.time_limit_secs, Some(2.5));
        assert_eq!(limits.poll_interval, 1024);
        assert_eq!(limits.search_limits().time_limit_secs, Some(2.5));
    }

    #[test]
    fn test_validate_time_limit() {
        assert!(RunLimits::default().validate().is_ok());
        let zero = RunLimits {
            time_limit_secs: Some(0.0),
            ..RunLimits::default()
        };
        assert!(zero.validate().is_ok());
        let negative = RunLimits {
            time_limit_secs: Some(-5.0),
            ..RunLimits::default()
        };
        assert_eq!(negative.validate(), Err(InvalidTimeLimit(-5.0)));
    }
}
