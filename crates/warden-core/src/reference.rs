//! Rule-based form of a password policy.
//!
//! Used to cross-check a hand-drawn automaton against the policy it is meant
//! to encode. Classes are compiled with the same matcher the automaton
//! loader uses, so both sides agree on what a label means.

use tracing::{debug, warn};
use warden_compiler::graph::AutomatonModel;
use warden_compiler::matcher::{PatternCompileError, SymbolMatcher};
use warden_model::simulate::Simulator;

#[derive(Debug, Clone)]
pub struct ReferenceRules {
    pub min_len: usize,
    /// Every symbol must match at least one of these.
    pub allowed: Vec<SymbolMatcher>,
    /// Each of these must match at least one symbol.
    pub required: Vec<SymbolMatcher>,
}

impl ReferenceRules {
    pub fn new(
        min_len: usize,
        allowed: &[&str],
        required: &[&str],
    ) -> Result<Self, PatternCompileError> {
        let compile = |labels: &[&str]| {
            labels
                .iter()
                .map(|label| SymbolMatcher::compile(Some(*label)))
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self {
            min_len,
            allowed: compile(allowed)?,
            required: compile(required)?,
        })
    }

    pub fn check(&self, word: &str) -> bool {
        if word.chars().count() < self.min_len {
            return false;
        }
        let allowed = word
            .chars()
            .all(|c| self.allowed.iter().any(|m| m.matches(c)));
        allowed
            && self
                .required
                .iter()
                .all(|m| word.chars().any(|c| m.matches(c)))
    }
}

/// A word the automaton and the rules decide differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub word: String,
    pub automaton: bool,
    pub rules: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossCheckReport {
    pub checked: u64,
    pub agreements: u64,
    /// First `max_samples` disagreements.
    pub mismatches: Vec<Mismatch>,
}

impl CrossCheckReport {
    pub fn disagreements(&self) -> u64 {
        self.checked - self.agreements
    }

    pub fn is_consistent(&self) -> bool {
        self.checked == self.agreements
    }
}

/// Run every word through both `model` and `rules`.
pub fn cross_check<I, S>(
    model: &AutomatonModel,
    rules: &ReferenceRules,
    words: I,
    max_samples: usize,
) -> CrossCheckReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sim = Simulator::new(model);
    let mut report = CrossCheckReport::default();

    for word in words {
        let word = word.as_ref();
        let automaton = sim.accepts(word);
        let expected = rules.check(word);
        report.checked += 1;
        if automaton == expected {
            report.agreements += 1;
        } else if report.mismatches.len() < max_samples {
            report.mismatches.push(Mismatch {
                word: word.to_string(),
                automaton,
                rules: expected,
            });
        }
    }

    if report.is_consistent() {
        debug!(checked = report.checked, "automaton agrees with rules");
    } else {
        warn!(
            checked = report.checked,
            disagreements = report.disagreements(),
            "automaton disagrees with rules"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_check() {
        let rules = ReferenceRules::new(3, &["[a-z]", "[0-9]"], &["[0-9]"]).unwrap();
        assert!(rules.check("ab1"));
        assert!(!rules.check("abc"));
        assert!(!rules.check("a1"));
        assert!(!rules.check("aB1"));
    }

    #[test]
    fn test_bad_class_is_rejected() {
        assert!(ReferenceRules::new(1, &["[z-a]"], &[]).is_err());
    }
}
