//! Stable machine-readable error codes.

/// Implemented by every error enum so callers can branch on a code
/// instead of matching on variants across crate boundaries.
pub trait PalateErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
pub const EMPTY_TRAINING_SET: &str = "EMPTY_TRAINING_SET";
pub const INSUFFICIENT_RATINGS: &str = "INSUFFICIENT_RATINGS";
pub const INVALID_SCALE: &str = "INVALID_SCALE";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const NO_PROFILE: &str = "NO_PROFILE";
pub const SOLVER_FAILURE: &str = "SOLVER_FAILURE";
pub const EVALUATION_ERROR: &str = "EVALUATION_ERROR";
pub const CATALOG_ERROR: &str = "CATALOG_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
