use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_RATING, MIN_RATING};
use crate::errors::ProfileError;

/// The closed rating range `[1, s]`.
///
/// Construction enforces `s > 1`; both the delta transform and the
/// estimator divide by `s - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RatingScale {
    max_rating: f64,
}

impl RatingScale {
    pub fn new(max_rating: f64) -> Result<Self, ProfileError> {
        if !max_rating.is_finite() || max_rating <= MIN_RATING {
            return Err(ProfileError::InvalidScale { max_rating });
        }
        Ok(Self { max_rating })
    }

    /// The top of the scale, `s`.
    pub fn max(&self) -> f64 {
        self.max_rating
    }

    pub fn min(&self) -> f64 {
        MIN_RATING
    }

    /// `s - 1`, the width of the scale.
    pub fn span(&self) -> f64 {
        self.max_rating - MIN_RATING
    }

    pub fn contains(&self, rating: f64) -> bool {
        (MIN_RATING..=self.max_rating).contains(&rating)
    }

    /// Reject ratings outside `[1, s]` (including NaN).
    pub fn validate(&self, rating: f64) -> Result<f64, ProfileError> {
        if self.contains(rating) {
            Ok(rating)
        } else {
            Err(ProfileError::InvalidRating {
                value: rating,
                max_rating: self.max_rating,
            })
        }
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            max_rating: DEFAULT_MAX_RATING,
        }
    }
}

impl TryFrom<f64> for RatingScale {
    type Error = ProfileError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingScale> for f64 {
    fn from(scale: RatingScale) -> Self {
        scale.max_rating
    }
}

/// One stored (user, system, item) rating. A later upsert for the same
/// key replaces both value and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub item_id: String,
    pub value: f64,
    pub rated_at: DateTime<Utc>,
}

impl RatingRecord {
    pub fn new(item_id: impl Into<String>, value: f64) -> Self {
        Self {
            item_id: item_id.into(),
            value,
            rated_at: Utc::now(),
        }
    }
}
