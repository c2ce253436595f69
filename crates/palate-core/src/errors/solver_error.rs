//! MIP backend errors.

use super::error_code::{self, PalateErrorCode};

/// Errors reported by an `IMipSolver` backend.
///
/// The profile formulation always admits a solution, so any of these
/// surfacing from a profile solve is an internal fault, not bad user input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("model {model} is infeasible")]
    Infeasible { model: String },

    #[error("model {model} is unbounded")]
    Unbounded { model: String },

    #[error("model {model} is not supported by the {backend} backend: {reason}")]
    UnsupportedModel {
        model: String,
        backend: String,
        reason: String,
    },

    #[error("model {model} is malformed: {reason}")]
    InvalidModel { model: String, reason: String },

    #[error("backend returned an unusable solution for {model}: {reason}")]
    InvalidSolution { model: String, reason: String },
}

impl PalateErrorCode for SolverError {
    fn error_code(&self) -> &'static str {
        error_code::SOLVER_FAILURE
    }
}
