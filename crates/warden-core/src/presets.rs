//! Built-in password policies.

use std::fmt;

use serde::{Deserialize, Serialize};
use warden_compiler::matcher::PatternCompileError;
use warden_explore::space::{SearchSpaceSpec, SpaceError};

use crate::reference::ReferenceRules;

const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%&*-_=+/?";

/// Class label matching every symbol in [`SYMBOLS`].
const SYMBOL_CLASS: &str = "[!@#$%&*-_=+/?]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPreset {
    /// Lowercase and digits, at least 4 symbols.
    Weak,
    /// Lowercase, uppercase and digits, all required, at least 6 symbols.
    Medium,
    /// Medium plus symbols, all four required, at least 8 symbols.
    Strong,
}

impl PolicyPreset {
    pub const ALL: [PolicyPreset; 3] = [PolicyPreset::Weak, PolicyPreset::Medium, PolicyPreset::Strong];

    pub fn label(&self) -> &'static str {
        match self {
            PolicyPreset::Weak => "weak",
            PolicyPreset::Medium => "medium",
            PolicyPreset::Strong => "strong",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Brute-force alphabet, in enumeration order.
    pub fn alphabet(&self) -> String {
        match self {
            PolicyPreset::Weak => [LOWER, DIGITS].concat(),
            PolicyPreset::Medium => [LOWER, UPPER, DIGITS].concat(),
            PolicyPreset::Strong => [LOWER, UPPER, DIGITS, SYMBOLS].concat(),
        }
    }

    /// Inclusive brute-force length range.
    pub fn lengths(&self) -> (usize, usize) {
        match self {
            PolicyPreset::Weak => (4, 6),
            PolicyPreset::Medium => (6, 8),
            PolicyPreset::Strong => (8, 10),
        }
    }

    pub fn search_space(&self) -> Result<SearchSpaceSpec, SpaceError> {
        let (min, max) = self.lengths();
        SearchSpaceSpec::new(self.alphabet().chars(), min, max)
    }

    /// Rule form of the policy, for checking an automaton against it.
    pub fn reference_rules(&self) -> Result<ReferenceRules, PatternCompileError> {
        match self {
            PolicyPreset::Weak => ReferenceRules::new(4, &["[a-z]", "[0-9]"], &[]),
            PolicyPreset::Medium => ReferenceRules::new(
                6,
                &["[a-z]", "[A-Z]", "[0-9]"],
                &["[a-z]", "[A-Z]", "[0-9]"],
            ),
            PolicyPreset::Strong => ReferenceRules::new(
                8,
                &["[a-z]", "[A-Z]", "[0-9]", SYMBOL_CLASS],
                &["[a-z]", "[A-Z]", "[0-9]", SYMBOL_CLASS],
            ),
        }
    }
}

impl fmt::Display for PolicyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
