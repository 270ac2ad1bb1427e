use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Fixed analysis policy. The thresholds are declarative constants made
/// visible for operators; nothing in the engine adapts them from data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// A closed ticket resolved more than this many days ago is too old to
    /// reopen automatically.
    pub reopen_grace_days: i64,
    /// A node offline for at least this many days counts as a long-term
    /// outage in temporal narratives.
    pub long_term_offline_days: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            reopen_grace_days: 7,
            long_term_offline_days: 30,
        }
    }
}

impl AnalysisConfig {
    /// Load config from a TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.reopen_grace_days, 7);
        assert_eq!(config.long_term_offline_days, 30);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: AnalysisConfig = toml::from_str("reopen_grace_days = 14").unwrap();
        assert_eq!(config.reopen_grace_days, 14);
        assert_eq!(config.long_term_offline_days, 30);
    }
}
