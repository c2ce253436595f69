use serde::{Deserialize, Serialize};

use crate::constants;

/// MIP backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Seed branch-and-bound with a local-search incumbent.
    pub warm_start: bool,
    /// Feasibility and pruning tolerance.
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            warm_start: true,
            tolerance: constants::DEFAULT_SOLVER_TOLERANCE,
        }
    }
}
