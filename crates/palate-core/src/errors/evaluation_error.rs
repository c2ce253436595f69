//! Cross-validation errors.

use super::error_code::{self, PalateErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("expected exactly {expected} {what}, got {actual}")]
    ItemCountMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("train size {train_size} outside 1..={item_count}")]
    InvalidTrainSize { train_size: usize, item_count: usize },

    #[error("trial count must be at least 1")]
    NoTrials,
}

impl PalateErrorCode for EvaluationError {
    fn error_code(&self) -> &'static str {
        error_code::EVALUATION_ERROR
    }
}
