//! Top-level Palate configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EvaluationConfig, ProfileConfig, ScaleConfig, SolverConfig, SystemConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`PALATE_*`)
/// 2. Config file
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PalateConfig {
    pub scale: ScaleConfig,
    pub profile: ProfileConfig,
    pub evaluation: EvaluationConfig,
    pub solver: SolverConfig,
    pub systems: Vec<SystemConfig>,
}

impl PalateConfig {
    /// Load from a TOML file, apply `PALATE_*` overrides, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut config: PalateConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: PalateConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale.scale().is_err() {
            return Err(ConfigError::ValidationFailed {
                field: "scale.max_rating".to_string(),
                message: format!("must be greater than 1, got {}", self.scale.max_rating),
            });
        }
        if self.profile.min_ratings == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "profile.min_ratings".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.evaluation.trials == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "evaluation.trials".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        let item_count = self.evaluation.item_count;
        if let Some(bad) = self
            .evaluation
            .train_sizes
            .iter()
            .find(|&&k| k == 0 || k > item_count)
        {
            return Err(ConfigError::ValidationFailed {
                field: "evaluation.train_sizes".to_string(),
                message: format!("{bad} is outside 1..={item_count}"),
            });
        }
        if !(self.solver.tolerance.is_finite() && self.solver.tolerance >= 0.0) {
            return Err(ConfigError::ValidationFailed {
                field: "solver.tolerance".to_string(),
                message: "must be a non-negative number".to_string(),
            });
        }
        let mut seen = std::collections::HashSet::new();
        for system in &self.systems {
            if !seen.insert(system.id.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: "systems".to_string(),
                    message: format!("duplicate system id '{}'", system.id),
                });
            }
        }
        Ok(())
    }

    /// Look up a configured system by id.
    pub fn system(&self, id: &str) -> Option<&SystemConfig> {
        self.systems.iter().find(|s| s.id == id)
    }

    /// Apply environment variable overrides.
    /// Pattern: `PALATE_MAX_RATING`, `PALATE_MIN_RATINGS`, etc.
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PALATE_MAX_RATING") {
            if let Ok(v) = val.parse::<f64>() {
                self.scale.max_rating = v;
            }
        }
        if let Ok(val) = std::env::var("PALATE_MIN_RATINGS") {
            if let Ok(v) = val.parse::<usize>() {
                self.profile.min_ratings = v;
            }
        }
        if let Ok(val) = std::env::var("PALATE_EVAL_TRIALS") {
            if let Ok(v) = val.parse::<usize>() {
                self.evaluation.trials = v;
            }
        }
        if let Ok(val) = std::env::var("PALATE_EVAL_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                self.evaluation.seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PALATE_EVAL_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                self.evaluation.parallel = v;
            }
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
