//! Top-level error aggregating every subsystem error.

use super::error_code::PalateErrorCode;
use super::{CatalogError, ConfigError, EvaluationError, ProfileError, SolverError};

/// Errors surfaced by any Palate operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PalateError {
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("solver failure: {0}")]
    Solver(#[from] SolverError),

    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type PalateResult<T> = Result<T, PalateError>;

impl PalateError {
    /// True when the caller can recover by collecting more ratings,
    /// as opposed to a data, configuration, or internal fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Profile(
                ProfileError::EmptyTrainingSet
                    | ProfileError::InsufficientRatings { .. }
                    | ProfileError::NoProfile { .. }
            )
        )
    }

    /// True when the MIP backend failed. Never retried automatically.
    pub fn is_solver_failure(&self) -> bool {
        matches!(self, Self::Solver(_))
    }
}

impl PalateErrorCode for PalateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Profile(e) => e.error_code(),
            Self::Solver(e) => e.error_code(),
            Self::Evaluation(e) => e.error_code(),
            Self::Catalog(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
