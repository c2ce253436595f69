use serde::{Deserialize, Serialize};

use crate::constants;

/// Cross-validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Labeled items per run.
    pub item_count: usize,
    /// Training-set sizes to score.
    pub train_sizes: Vec<usize>,
    /// Random splits averaged per training-set size.
    pub trials: usize,
    /// Fixed seed for reproducible splits. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Run trials on the rayon pool.
    pub parallel: bool,
    /// Decimal places kept on reported averages.
    pub mae_decimals: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            item_count: constants::EVALUATION_ITEM_COUNT,
            train_sizes: constants::EVALUATION_TRAIN_SIZES.to_vec(),
            trials: constants::EVALUATION_TRIALS,
            seed: None,
            parallel: true,
            mae_decimals: constants::DEFAULT_MAE_DECIMALS,
        }
    }
}

impl EvaluationConfig {
    /// Default configuration pinned to `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
