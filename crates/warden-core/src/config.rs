//! Batch configuration, loaded from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use warden_explore::dictionary::{DecodePolicy, DictionaryOptions};

use crate::limits::{InvalidTimeLimit, RunLimits};
use crate::presets::PolicyPreset;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid batch configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidTimeLimit(#[from] InvalidTimeLimit),
}

/// Policies to evaluate and the limits shared by all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub policies: Vec<PolicyConfig>,
    #[serde(default)]
    pub limits: RunLimits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Report label.
    pub label: String,
    /// `.jff` or `.json` automaton definition.
    pub automaton: PathBuf,
    #[serde(default)]
    pub brute_force: Option<BruteForceConfig>,
    #[serde(default)]
    pub dictionary: Option<DictionaryConfig>,
}

/// Brute-force parameters. Unset fields come from `preset`, or from the
/// preset named by the policy label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BruteForceConfig {
    pub preset: Option<PolicyPreset>,
    pub alphabet: Option<String>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    /// Stop once this candidate is produced.
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub decode: DecodePolicy,
}

impl DictionaryConfig {
    pub fn options(&self) -> DictionaryOptions {
        DictionaryOptions {
            decode: self.decode,
            ..DictionaryOptions::default()
        }
    }
}

impl BatchConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.limits.validate()?;
        Ok(config)
    }

    /// Load a config file. Relative paths inside it are resolved against
    /// the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&json)?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        for policy in &mut self.policies {
            policy.automaton = base.join(&policy.automaton);
            if let Some(dict) = &mut policy.dictionary {
                dict.path = base.join(&dict.path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_policy() {
        let config = BatchConfig::from_json(
            r#"{"policies": [{"label": "weak", "automaton": "weak.jff"}]}"#,
        )
        .unwrap();
        assert_eq!(config.policies.len(), 1);
        assert_eq!(config.policies[0].brute_force, None);
        assert_eq!(config.limits, RunLimits::default());
    }

    #[test]
    fn test_negative_time_limit_is_rejected() {
        let err = BatchConfig::from_json(
            r#"{"policies": [], "limits": {"time_limit_secs": -5}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeLimit(InvalidTimeLimit(secs)) if secs == -5.0));
    }

    #[test]
    fn test_rebase_keeps_absolute_paths() {
        let mut config = BatchConfig::from_json(
            r#"{"policies": [{
                "label": "x",
                "automaton": "/abs/x.jff",
                "dictionary": {"path": "words.txt", "decode": "lossy"}
            }]}"#,
        )
        .unwrap();
        config.rebase(Path::new("/cfg"));
        let policy = &config.policies[0];
        assert_eq!(policy.automaton, PathBuf::from("/abs/x.jff"));
        let dict = policy.dictionary.as_ref().unwrap();
        assert_eq!(dict.path, PathBuf::from("/cfg/words.txt"));
        assert_eq!(dict.decode, DecodePolicy::Lossy);
    }
}
