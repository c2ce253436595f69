use serde::{Deserialize, Serialize};

use crate::constants;

/// Profile refresh and recommendation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Ratings required before a profile is solved.
    pub min_ratings: usize,
    /// Recommendations returned per request.
    pub recommendation_limit: usize,
    /// Decimal places kept on per-item estimates.
    pub estimate_decimals: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            min_ratings: constants::DEFAULT_MIN_RATINGS,
            recommendation_limit: constants::DEFAULT_RECOMMENDATION_LIMIT,
            estimate_decimals: constants::DEFAULT_ESTIMATE_DECIMALS,
        }
    }
}
