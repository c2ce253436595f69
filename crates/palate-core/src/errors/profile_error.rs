//! Profile, rating, and estimation errors.

use super::error_code::{self, PalateErrorCode};

/// Errors raised while validating inputs to the delta transform,
/// the profile solver, or the rating estimator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("insufficient ratings: {required} required, {available} available")]
    InsufficientRatings { required: usize, available: usize },

    #[error("invalid rating scale {max_rating}: the top of the scale must be greater than 1")]
    InvalidScale { max_rating: f64 },

    #[error("rating {value} outside the scale [1, {max_rating}]")]
    InvalidRating { value: f64, max_rating: f64 },

    #[error("delta {value} at position {index} outside [0, {dimension}]")]
    InvalidDelta {
        index: usize,
        value: f64,
        dimension: usize,
    },

    #[error("feature value {value} at position {index} is not 0 or 1")]
    InvalidFeatureValue { index: usize, value: i64 },

    #[error("preference value {value} is not -1, 0, or 1")]
    InvalidPreferenceValue { value: i64 },

    #[error("feature vectors must have at least one feature")]
    EmptyFeatureVector,

    #[error("no profile stored for user {user} in system {system}")]
    NoProfile { user: String, system: String },
}

impl ProfileError {
    /// Shorthand for a [`ProfileError::DimensionMismatch`].
    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}

impl PalateErrorCode for ProfileError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } | Self::EmptyFeatureVector => {
                error_code::DIMENSION_MISMATCH
            }
            Self::EmptyTrainingSet => error_code::EMPTY_TRAINING_SET,
            Self::InsufficientRatings { .. } => error_code::INSUFFICIENT_RATINGS,
            Self::InvalidScale { .. } => error_code::INVALID_SCALE,
            Self::InvalidRating { .. }
            | Self::InvalidDelta { .. }
            | Self::InvalidFeatureValue { .. }
            | Self::InvalidPreferenceValue { .. } => error_code::INVALID_INPUT,
            Self::NoProfile { .. } => error_code::NO_PROFILE,
        }
    }
}
