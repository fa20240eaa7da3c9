//! Coarse feasibility classification of a brute-force search space.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::space::SearchSpaceSpec;

/// Spaces at or below this size are feasible.
pub const FEASIBLE_MAX: u128 = 100_000_000;
/// Spaces at or below this size (and above [`FEASIBLE_MAX`]) are borderline.
pub const BORDERLINE_MAX: u128 = 1_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Viability {
    Feasible,
    Borderline,
    Infeasible,
}

impl Viability {
    pub fn classify(space_size: u128) -> Self {
        if space_size <= FEASIBLE_MAX {
            Viability::Feasible
        } else if space_size <= BORDERLINE_MAX {
            Viability::Borderline
        } else {
            Viability::Infeasible
        }
    }

    pub fn comment(&self) -> &'static str {
        match self {
            Viability::Feasible => "feasible (space <= 10^8)",
            Viability::Borderline => "borderline / slow (10^8 < space <= 10^12)",
            Viability::Infeasible => "infeasible in practical time (space > 10^12)",
        }
    }
}

impl fmt::Display for Viability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.comment())
    }
}

/// Viability of a full space plus what the observed run says about it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViabilityEstimate {
    pub space_size: u128,
    pub class: Viability,
    /// Candidates per second observed during the run, if any were tested.
    pub throughput: Option<f64>,
    /// Projected time to test the whole space. Only set when the target was
    /// not found and throughput is positive.
    pub time_to_exhaust: Option<Duration>,
}

impl ViabilityEstimate {
    pub fn new(spec: &SearchSpaceSpec, attempts: u64, elapsed: Duration, target_found: bool) -> Self {
        let space_size = spec.total_size();
        let throughput = throughput(attempts, elapsed);
        let time_to_exhaust = if target_found {
            None
        } else {
            throughput
                .filter(|rate| *rate > 0.0)
                .and_then(|rate| Duration::try_from_secs_f64(space_size as f64 / rate).ok())
        };
        Self {
            space_size,
            class: Viability::classify(space_size),
            throughput,
            time_to_exhaust,
        }
    }

    /// Human-readable summary, e.g. for a report's viability column.
    pub fn describe(&self) -> String {
        match self.time_to_exhaust {
            Some(eta) => format!(
                "{}; ~{:.0}s to exhaust {} candidates",
                self.class,
                eta.as_secs_f64(),
                self.space_size
            ),
            None => format!("{}; {} candidates", self.class, self.space_size),
        }
    }
}

/// Candidates per second, or `None` when nothing was timed.
pub fn throughput(attempts: u64, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    if attempts == 0 || secs <= 0.0 {
        return None;
    }
    Some(attempts as f64 / secs)
}
