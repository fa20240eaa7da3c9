//! Brute-force drivers.
//!
//! Sequential drivers walk the space in enumeration order. Parallel drivers
//! split the ordinal range into contiguous chunks and evaluate them with
//! rayon; counters are reduced after every chunk reports, and a targeted
//! search keeps the smallest matching ordinal so the answer does not depend
//! on which worker finishes first.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, info};
use warden_compiler::graph::AutomatonModel;
use warden_model::simulate::Simulator;

use crate::budget::{SearchLimits, StopReason, TimeBudget};
use crate::outcome::{AttackOutcome, NullSink, OutcomeSink};
use crate::space::SearchSpaceSpec;
use crate::viability::{self, ViabilityEstimate};

/// Chunks handed out per worker thread in parallel runs.
const CHUNKS_PER_THREAD: u64 = 64;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Totals of an untargeted brute-force run.
#[derive(Debug, Clone, PartialEq)]
pub struct BruteForceReport {
    pub attempts: u64,
    pub accepted: u64,
    pub elapsed: Duration,
    pub stop: StopReason,
}

impl BruteForceReport {
    pub fn throughput(&self) -> Option<f64> {
        viability::throughput(self.attempts, self.elapsed)
    }
}

/// How a targeted run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// The target was produced at this ordinal.
    Found { index: u64 },
    /// The whole space was tested without producing the target.
    NotFound,
    /// The time budget ran out before the target was produced.
    TimeLimitReached,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    pub target: String,
    pub status: TargetStatus,
    /// Candidates tested. For a found target this is `index + 1`.
    pub attempts: u64,
    /// Tested candidates the automaton accepted.
    pub accepted: u64,
    pub elapsed: Duration,
    /// Whether the policy itself accepts the target.
    pub target_accepted: bool,
    pub viability: ViabilityEstimate,
}

impl TargetReport {
    pub fn found_index(&self) -> Option<u64> {
        match self.status {
            TargetStatus::Found { index } => Some(index),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.found_index().is_some()
    }
}

// ── Sequential ───────────────────────────────────────────────────────

/// Test every candidate in `spec` against `model`.
pub fn run_brute_force(
    model: &AutomatonModel,
    spec: &SearchSpaceSpec,
    limits: &SearchLimits,
) -> BruteForceReport {
    run_brute_force_with_sink(model, spec, limits, &mut NullSink)
}

/// Like [`run_brute_force`], reporting every candidate to `sink`.
pub fn run_brute_force_with_sink(
    model: &AutomatonModel,
    spec: &SearchSpaceSpec,
    limits: &SearchLimits,
    sink: &mut dyn OutcomeSink,
) -> BruteForceReport {
    debug!(space = %spec.total_size(), "starting brute force");
    let budget = TimeBudget::start(limits);
    let mut sim = Simulator::new(model);
    let mut candidates = spec.candidates();

    let mut attempts = 0u64;
    let mut accepted = 0u64;
    let mut stop = StopReason::Completed;

    while let Some((index, word)) = candidates.next_candidate() {
        attempts += 1;
        let ok = sim.accepts(word);
        if ok {
            accepted += 1;
        }
        sink.observe(&AttackOutcome {
            candidate: word.to_string(),
            accepted: ok,
            index,
        });
        if budget.poll(attempts) {
            stop = StopReason::TimeLimitReached;
            break;
        }
    }

    let report = BruteForceReport {
        attempts,
        accepted,
        elapsed: budget.elapsed(),
        stop,
    };
    info!(
        attempts = report.attempts,
        accepted = report.accepted,
        elapsed = ?report.elapsed,
        stop = ?report.stop,
        "brute force finished"
    );
    report
}

/// Enumerate `spec` until `target` comes up, the budget runs out, or the
/// space is exhausted.
pub fn run_brute_force_target(
    model: &AutomatonModel,
    spec: &SearchSpaceSpec,
    target: &str,
    limits: &SearchLimits,
) -> TargetReport {
    run_brute_force_target_with_sink(model, spec, target, limits, &mut NullSink)
}

pub fn run_brute_force_target_with_sink(
    model: &AutomatonModel,
    spec: &SearchSpaceSpec,
    target: &str,
    limits: &SearchLimits,
    sink: &mut dyn OutcomeSink,
) -> TargetReport {
    debug!(space = %spec.total_size(), "starting targeted brute force");
    let budget = TimeBudget::start(limits);
    let mut sim = Simulator::new(model);
    let mut candidates = spec.candidates();

    let mut attempts = 0u64;
    let mut accepted = 0u64;
    let mut status = TargetStatus::NotFound;

    while let Some((index, word)) = candidates.next_candidate() {
        attempts += 1;
        let ok = sim.accepts(word);
        if ok {
            accepted += 1;
        }
        sink.observe(&AttackOutcome {
            candidate: word.to_string(),
            accepted: ok,
            index,
        });
        if word == target {
            status = TargetStatus::Found { index };
            break;
        }
        if budget.poll(attempts) {
            status = TargetStatus::TimeLimitReached;
            break;
        }
    }

    finish_target(
        spec,
        target,
        status,
        attempts,
        accepted,
        budget.elapsed(),
        sim.accepts(target),
    )
}

// ── Parallel ─────────────────────────────────────────────────────────

/// Parallel [`run_brute_force`]. Totals match the sequential run exactly
/// when no time limit interrupts it.
pub fn run_brute_force_parallel(
    model: &AutomatonModel,
    spec: &SearchSpaceSpec,
    limits: &SearchLimits,
) -> Result<BruteForceReport, SearchError> {
    with_pool(limits, || {
        let budget = TimeBudget::start(limits);
        let stopped = AtomicBool::new(false);
        let chunks = chunk_ranges(spec);
        debug!(
            space = %spec.total_size(),
            chunks = chunks.len(),
            "starting parallel brute force"
        );

        let results: Vec<ChunkResult> = chunks
            .par_iter()
            .map(|&(start, end)| {
                let never = AtomicU64::new(u64::MAX);
                scan_chunk(model, spec, start, end, None, &budget, &stopped, &never)
            })
            .collect();

        let attempts = results.iter().map(|r| r.tested).sum();
        let accepted = results.iter().map(|r| r.accepted).sum();
        let stop = if stopped.load(Ordering::Relaxed) {
            StopReason::TimeLimitReached
        } else {
            StopReason::Completed
        };

        let report = BruteForceReport {
            attempts,
            accepted,
            elapsed: budget.elapsed(),
            stop,
        };
        info!(
            attempts = report.attempts,
            accepted = report.accepted,
            elapsed = ?report.elapsed,
            stop = ?report.stop,
            "parallel brute force finished"
        );
        report
    })
}

/// Parallel [`run_brute_force_target`]. The found index is always the
/// smallest matching ordinal, as in a sequential run.
pub fn run_brute_force_target_parallel(
    model: &AutomatonModel,
    spec: &SearchSpaceSpec,
    target: &str,
    limits: &SearchLimits,
) -> Result<TargetReport, SearchError> {
    with_pool(limits, || {
        let budget = TimeBudget::start(limits);
        let stopped = AtomicBool::new(false);
        let best = AtomicU64::new(u64::MAX);
        let chunks = chunk_ranges(spec);

        let results: Vec<ChunkResult> = chunks
            .par_iter()
            .map(|&(start, end)| {
                scan_chunk(model, spec, start, end, Some(target), &budget, &stopped, &best)
            })
            .collect();

        let found = results
            .iter()
            .filter_map(|r| r.found)
            .min()
            .filter(|&index| prefix_complete(&results, index));
        let (status, attempts, accepted) = match found {
            Some(index) => {
                // Only candidates up to the match count, as if run in order.
                let accepted = results
                    .iter()
                    .filter(|r| r.start <= index)
                    .map(|r| r.accepted)
                    .sum();
                (TargetStatus::Found { index }, index + 1, accepted)
            }
            None => {
                // A match behind a gap the budget left untested is reported
                // the way a sequential run would see it: out of time.
                let attempts = results.iter().map(|r| r.tested).sum();
                let accepted = results.iter().map(|r| r.accepted).sum();
                let status = if stopped.load(Ordering::Relaxed) {
                    TargetStatus::TimeLimitReached
                } else {
                    TargetStatus::NotFound
                };
                (status, attempts, accepted)
            }
        };

        let target_accepted = Simulator::new(model).accepts(target);
        finish_target(
            spec,
            target,
            status,
            attempts,
            accepted,
            budget.elapsed(),
            target_accepted,
        )
    })
}

#[derive(Debug, Clone, Copy)]
struct ChunkResult {
    start: u64,
    end: u64,
    tested: u64,
    accepted: u64,
    found: Option<u64>,
}

/// Evaluate ordinals `[start, end)`.
///
/// Stops early on a match, when the shared budget is spent, or once the
/// scan passes the best match another chunk already reported.
#[allow(clippy::too_many_arguments)]
fn scan_chunk(
    model: &AutomatonModel,
    spec: &SearchSpaceSpec,
    start: u64,
    end: u64,
    target: Option<&str>,
    budget: &TimeBudget,
    stopped: &AtomicBool,
    best: &AtomicU64,
) -> ChunkResult {
    let mut result = ChunkResult {
        start,
        end,
        tested: 0,
        accepted: 0,
        found: None,
    };
    if stopped.load(Ordering::Relaxed) || start > best.load(Ordering::Relaxed) {
        return result;
    }

    let mut sim = Simulator::new(model);
    let mut candidates = spec.candidates_from(start);
    let interval = budget.poll_interval();

    while let Some((index, word)) = candidates.next_candidate() {
        if index >= end {
            break;
        }
        result.tested += 1;
        if sim.accepts(word) {
            result.accepted += 1;
        }
        if target == Some(word) {
            result.found = Some(index);
            best.fetch_min(index, Ordering::Relaxed);
            break;
        }
        if result.tested % interval == 0 {
            if stopped.load(Ordering::Relaxed) || index > best.load(Ordering::Relaxed) {
                break;
            }
            if budget.exceeded() {
                stopped.store(true, Ordering::Relaxed);
                break;
            }
        }
    }
    result
}

/// True when every ordinal up to and including `index` was tested.
fn prefix_complete(results: &[ChunkResult], index: u64) -> bool {
    results
        .iter()
        .filter(|r| r.start <= index)
        .all(|r| r.tested == r.end.min(index + 1) - r.start)
}

/// Split the ordinal range into contiguous `[start, end)` chunks.
fn chunk_ranges(spec: &SearchSpaceSpec) -> Vec<(u64, u64)> {
    let total = u64::try_from(spec.total_size()).unwrap_or(u64::MAX);
    if total == 0 {
        return Vec::new();
    }
    let threads = rayon::current_num_threads().max(1) as u64;
    let count = (threads * CHUNKS_PER_THREAD).min(total);
    let size = total.div_ceil(count);

    let mut ranges = Vec::with_capacity(count as usize);
    let mut start = 0u64;
    while start < total {
        let end = start.saturating_add(size).min(total);
        ranges.push((start, end));
        start = end;
    }
    ranges
}

fn with_pool<T: Send>(
    limits: &SearchLimits,
    op: impl FnOnce() -> T + Send,
) -> Result<T, SearchError> {
    match limits.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            Ok(pool.install(op))
        }
        None => Ok(op()),
    }
}

fn finish_target(
    spec: &SearchSpaceSpec,
    target: &str,
    status: TargetStatus,
    attempts: u64,
    accepted: u64,
    elapsed: Duration,
    target_accepted: bool,
) -> TargetReport {
    let found = matches!(status, TargetStatus::Found { .. });
    let viability = ViabilityEstimate::new(spec, attempts, elapsed, found);
    info!(
        status = ?status,
        attempts,
        accepted,
        elapsed = ?elapsed,
        viability = %viability.class,
        "targeted brute force finished"
    );
    TargetReport {
        target: target.to_string(),
        status,
        attempts,
        accepted,
        elapsed,
        target_accepted,
        viability,
    }
}
