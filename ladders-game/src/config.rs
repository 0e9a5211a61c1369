//! Run configuration loaded from JSON, with every field defaulted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_TIMED_FLOOR, DEFAULT_WORKERS};
use crate::median::MedianMode;
use crate::seed::SeedPlan;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("workers must be at least 1 (got {0})")]
    NoWorkers(usize),
    #[error("adaptive floor must be at least 1 (got {0})")]
    ZeroFloor(u64),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables shared by every run, independent of the chosen workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "RunConfig::default_workers")]
    pub workers: usize,
    /// Smallest cumulative total for timed runs.
    #[serde(default = "RunConfig::default_floor")]
    pub floor: u64,
    /// Seed for reproducible runs; fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "RunConfig::default_median")]
    pub median: MedianMode,
}

impl RunConfig {
    const fn default_workers() -> usize {
        DEFAULT_WORKERS
    }

    const fn default_floor() -> u64 {
        DEFAULT_TIMED_FLOOR
    }

    const fn default_median() -> MedianMode {
        MedianMode::High
    }

    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers(self.workers));
        }
        if self.floor == 0 {
            return Err(ConfigError::ZeroFloor(self.floor));
        }
        Ok(())
    }

    #[must_use]
    pub fn seed_plan(&self) -> SeedPlan {
        SeedPlan::from_option(self.seed)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: Self::default_workers(),
            floor: Self::default_floor(),
            seed: None,
            median: Self::default_median(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = RunConfig::from_json("{}").unwrap();
        assert_eq!(cfg, RunConfig::default());
        assert_eq!(cfg.workers, 1);
        assert_eq!(cfg.floor, 100);
        assert_eq!(cfg.median, MedianMode::High);
        assert_eq!(cfg.seed_plan(), SeedPlan::Entropy);
    }

    #[test]
    fn parses_overrides() {
        let cfg =
            RunConfig::from_json(r#"{"workers": 8, "floor": 1000, "seed": 42, "median": "mean_of_middle"}"#)
                .unwrap();
        assert_eq!(cfg.workers, 8);
        assert_eq!(cfg.floor, 1000);
        assert_eq!(cfg.seed_plan(), SeedPlan::Fixed(42));
        assert_eq!(cfg.median, MedianMode::MeanOfMiddle);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            RunConfig::from_json(r#"{"workers": 0}"#),
            Err(ConfigError::NoWorkers(0))
        ));
        assert!(matches!(
            RunConfig::from_json(r#"{"floor": 0}"#),
            Err(ConfigError::ZeroFloor(0))
        ));
        assert!(matches!(
            RunConfig::from_json(r#"{"median": "middle"}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
