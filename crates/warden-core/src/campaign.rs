//! Batch runner.
//!
//! Evaluates each configured policy in turn. A policy that fails is
//! recorded and skipped; the rest of the batch still runs.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use tracing::{info, warn};
use warden_compiler::compile::{load, LoadError};
use warden_compiler::graph::AutomatonModel;
use warden_explore::brute::{
    run_brute_force, run_brute_force_parallel, run_brute_force_target,
    run_brute_force_target_parallel, SearchError,
};
use warden_explore::dictionary::{run_dictionary, run_dictionary_parallel, DictionaryError};
use warden_explore::space::{SearchSpaceSpec, SpaceError};

use crate::config::{BatchConfig, BruteForceConfig, DictionaryConfig, PolicyConfig};
use crate::limits::RunLimits;
use crate::metrics::{MetricsCollector, MetricsRecord, MetricsTable, RunOutcome};
use crate::presets::PolicyPreset;

#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("Failed to load automaton: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid search space: {0}")]
    Space(#[from] SpaceError),

    #[error("No alphabet or length range for policy '{policy}' and no matching preset")]
    MissingSearchSpace { policy: String },

    #[error("Failed to open dictionary {path}: {source}")]
    DictionaryOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dictionary run failed: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),
}

#[derive(Debug)]
pub struct PolicyFailure {
    pub policy: String,
    pub error: CampaignError,
}

#[derive(Debug)]
pub struct BatchReport {
    pub table: MetricsTable,
    pub failures: Vec<PolicyFailure>,
}

pub fn run_batch(config: &BatchConfig) -> BatchReport {
    let mut records = Vec::with_capacity(config.policies.len());
    let mut failures = Vec::new();

    for policy in &config.policies {
        match run_policy(policy, &config.limits) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(policy = %policy.label, %error, "policy failed");
                failures.push(PolicyFailure {
                    policy: policy.label.clone(),
                    error,
                });
            }
        }
    }

    BatchReport {
        table: MetricsTable { records },
        failures,
    }
}

/// Load one policy's automaton and run every configured mode against it.
pub fn run_policy(policy: &PolicyConfig, limits: &RunLimits) -> Result<MetricsRecord, CampaignError> {
    let model = load(&policy.automaton)?;
    info!(
        policy = %policy.label,
        states = model.state_count(),
        deterministic = model.is_deterministic(),
        "evaluating policy"
    );

    let mut collector = MetricsCollector::new(policy.label.clone());
    if let Some(brute) = &policy.brute_force {
        let spec = resolve_space(&policy.label, brute)?;
        collector.record(&brute_force(&model, &spec, brute, limits)?);
    }
    if let Some(dict) = &policy.dictionary {
        collector.record(&dictionary(&model, dict, limits)?);
    }

    let record = collector.finish();
    info!(
        policy = %record.policy,
        attempts = ?record.attempts,
        accepted = ?record.accepted,
        dict_accepted = ?record.dict_accepted,
        "policy finished"
    );
    Ok(record)
}

fn resolve_space(label: &str, brute: &BruteForceConfig) -> Result<SearchSpaceSpec, CampaignError> {
    let preset = brute.preset.or_else(|| PolicyPreset::from_label(label));
    let missing = || CampaignError::MissingSearchSpace {
        policy: label.to_string(),
    };

    let alphabet = match (&brute.alphabet, preset) {
        (Some(alphabet), _) => alphabet.clone(),
        (None, Some(preset)) => preset.alphabet(),
        (None, None) => return Err(missing()),
    };
    let defaults = preset.map(|p| p.lengths());
    let min_len = brute.min_len.or(defaults.map(|d| d.0)).ok_or_else(missing)?;
    let max_len = brute.max_len.or(defaults.map(|d| d.1)).ok_or_else(missing)?;

    Ok(SearchSpaceSpec::new(alphabet.chars(), min_len, max_len)?)
}

fn brute_force(
    model: &AutomatonModel,
    spec: &SearchSpaceSpec,
    brute: &BruteForceConfig,
    limits: &RunLimits,
) -> Result<RunOutcome, CampaignError> {
    let search = limits.search_limits();
    let outcome = match (&brute.target, limits.parallel) {
        (Some(target), false) => run_brute_force_target(model, spec, target, &search).into(),
        (Some(target), true) => run_brute_force_target_parallel(model, spec, target, &search)?.into(),
        (None, false) => run_brute_force(model, spec, &search).into(),
        (None, true) => run_brute_force_parallel(model, spec, &search)?.into(),
    };
    Ok(outcome)
}

fn dictionary(
    model: &AutomatonModel,
    dict: &DictionaryConfig,
    limits: &RunLimits,
) -> Result<RunOutcome, CampaignError> {
    let file = File::open(&dict.path).map_err(|source| CampaignError::DictionaryOpen {
        path: dict.path.clone(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut options = dict.options();
    options.workers = limits.threads;

    let report = if limits.parallel {
        run_dictionary_parallel(model, reader, &options)?
    } else {
        run_dictionary(model, reader, &options)?
    };
    Ok(report.into())
}
