use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::ProfileError;
use crate::models::RatingScale;

/// Rating scale configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Top of the rating scale, `s`. Must be greater than 1.
    pub max_rating: f64,
}

impl ScaleConfig {
    pub fn scale(&self) -> Result<RatingScale, ProfileError> {
        RatingScale::new(self.max_rating)
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            max_rating: constants::DEFAULT_MAX_RATING,
        }
    }
}
