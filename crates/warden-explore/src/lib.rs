pub mod brute;
pub mod budget;
pub mod dictionary;
pub mod outcome;
pub mod space;
pub mod viability;

pub use brute::{
    run_brute_force, run_brute_force_parallel, run_brute_force_target,
    run_brute_force_target_parallel, BruteForceReport, SearchError, TargetReport, TargetStatus,
};
pub use budget::{SearchLimits, StopReason};
pub use dictionary::{
    run_dictionary, run_dictionary_parallel, run_dictionary_words, DecodePolicy,
    DictionaryError, DictionaryOptions, DictionaryReport,
};
pub use outcome::{AttackOutcome, OutcomeSink};
pub use space::{SearchSpaceSpec, SpaceError};
pub use viability::{Viability, ViabilityEstimate};
