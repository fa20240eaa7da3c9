//! Per-policy metrics and report rows.
//!
//! A [`MetricsRecord`] folds the reports of every run made against one
//! policy. Modes that did not run stay `None` and render as `"-"`.

use std::time::Duration;

use serde::Serialize;
use warden_explore::brute::{BruteForceReport, TargetReport};
use warden_explore::dictionary::DictionaryReport;
use warden_explore::viability::Viability;

/// Placeholder for a metric whose mode was skipped.
pub const MISSING: &str = "-";

/// Report of one finished run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    BruteForce(BruteForceReport),
    Target(TargetReport),
    Dictionary(DictionaryReport),
}

impl From<BruteForceReport> for RunOutcome {
    fn from(report: BruteForceReport) -> Self {
        RunOutcome::BruteForce(report)
    }
}

impl From<TargetReport> for RunOutcome {
    fn from(report: TargetReport) -> Self {
        RunOutcome::Target(report)
    }
}

impl From<DictionaryReport> for RunOutcome {
    fn from(report: DictionaryReport) -> Self {
        RunOutcome::Dictionary(report)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsRecord {
    pub policy: String,
    /// Brute-force candidates tested.
    pub attempts: Option<u64>,
    /// Brute-force candidates accepted.
    pub accepted: Option<u64>,
    /// Brute-force wall time.
    pub elapsed: Option<Duration>,
    pub dict_attempts: Option<u64>,
    pub dict_accepted: Option<u64>,
    pub dict_elapsed: Option<Duration>,
    pub target_found: Option<bool>,
    pub found_index: Option<u64>,
    pub viability: Option<Viability>,
    pub time_to_exhaust: Option<Duration>,
}

impl MetricsRecord {
    pub fn new(policy: impl Into<String>) -> Self {
        Self {
            policy: policy.into(),
            ..Self::default()
        }
    }

    /// Brute-force candidates per second.
    pub fn throughput(&self) -> Option<f64> {
        warden_explore::viability::throughput(self.attempts?, self.elapsed?)
    }

    /// Dictionary acceptance rate, 0 when the dictionary was empty.
    pub fn dict_rate(&self) -> Option<f64> {
        let attempts = self.dict_attempts?;
        let accepted = self.dict_accepted.unwrap_or(0);
        Some(if attempts == 0 {
            0.0
        } else {
            accepted as f64 / attempts as f64
        })
    }

    pub fn viability_comment(&self) -> Option<String> {
        let class = self.viability?;
        Some(match self.time_to_exhaust {
            Some(eta) => format!("{class}; ~{:.0}s to exhaust", eta.as_secs_f64()),
            None => class.to_string(),
        })
    }

    pub fn to_row(&self) -> ReportRow {
        ReportRow {
            policy: self.policy.clone(),
            attempts: or_missing(self.attempts),
            accepted: or_missing(self.accepted),
            elapsed_seconds: or_missing(self.elapsed.map(|d| format!("{:.2}", d.as_secs_f64()))),
            accepted_dict: or_missing(self.dict_accepted),
            dict_rate: or_missing(self.dict_rate().map(|r| format!("{r:.4}"))),
            target_found: or_missing(self.target_found),
            found_index: or_missing(self.found_index),
            viability_comment: or_missing(self.viability_comment()),
        }
    }
}

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn add(total: Option<u64>, value: u64) -> Option<u64> {
    Some(total.unwrap_or(0).saturating_add(value))
}

fn add_time(total: Option<Duration>, value: Duration) -> Option<Duration> {
    Some(total.unwrap_or_default().saturating_add(value))
}

/// Accumulates the runs made against one policy.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    record: MetricsRecord,
}

impl MetricsCollector {
    pub fn new(policy: impl Into<String>) -> Self {
        Self {
            record: MetricsRecord::new(policy),
        }
    }

    pub fn record(&mut self, outcome: &RunOutcome) {
        let r = &mut self.record;
        match outcome {
            RunOutcome::BruteForce(report) => {
                r.attempts = add(r.attempts, report.attempts);
                r.accepted = add(r.accepted, report.accepted);
                r.elapsed = add_time(r.elapsed, report.elapsed);
            }
            RunOutcome::Target(report) => {
                r.attempts = add(r.attempts, report.attempts);
                r.accepted = add(r.accepted, report.accepted);
                r.elapsed = add_time(r.elapsed, report.elapsed);
                r.target_found = Some(report.is_found());
                r.found_index = report.found_index();
                r.viability = Some(report.viability.class);
                r.time_to_exhaust = report.viability.time_to_exhaust;
            }
            RunOutcome::Dictionary(report) => {
                r.dict_attempts = add(r.dict_attempts, report.attempts);
                r.dict_accepted = add(r.dict_accepted, report.accepted);
                r.dict_elapsed = add_time(r.dict_elapsed, report.elapsed);
            }
        }
    }

    pub fn finish(self) -> MetricsRecord {
        self.record
    }
}

/// Fold `outcomes` into a single record for `policy`.
pub fn record(policy: &str, outcomes: &[RunOutcome]) -> MetricsRecord {
    let mut collector = MetricsCollector::new(policy);
    for outcome in outcomes {
        collector.record(outcome);
    }
    collector.finish()
}

/// Report rows for several policies, one per record, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsTable {
    pub records: Vec<MetricsRecord>,
}

impl MetricsTable {
    pub fn rows(&self) -> Vec<ReportRow> {
        self.records.iter().map(MetricsRecord::to_row).collect()
    }

    pub fn get(&self, policy: &str) -> Option<&MetricsRecord> {
        self.records.iter().find(|r| r.policy == policy)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn merge(records: &[MetricsRecord]) -> MetricsTable {
    MetricsTable {
        records: records.to_vec(),
    }
}

/// One line of the final report, every field pre-formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub policy: String,
    pub attempts: String,
    pub accepted: String,
    pub elapsed_seconds: String,
    pub accepted_dict: String,
    pub dict_rate: String,
    pub target_found: String,
    pub found_index: String,
    pub viability_comment: String,
}
