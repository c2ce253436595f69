//! # palate-solver
//!
//! Turns sparse star ratings into a ternary preference profile and scores
//! items against it.
//!
//! - [`delta`]: rating ⇄ target mismatch count.
//! - [`formulation`]: the profile MIP, backend-neutral.
//! - [`mip`]: model vocabulary, the [`IMipSolver`] seam, and the bundled
//!   [`BranchAndBound`] backend.
//! - [`estimator`]: profile + features → predicted rating.

pub mod delta;
pub mod engine;
pub mod estimator;
pub mod formulation;
pub mod local_search;
pub mod mip;

pub use delta::{compute_deltas, rating_for_delta};
pub use engine::{ProfileSolution, ProfileSolver};
pub use estimator::{estimate_rating, estimate_ratings, round_to};
pub use formulation::ProfileFormulation;
pub use mip::{BranchAndBound, IMipSolver, MipModel, MipSolution};

use palate_core::errors::PalateResult;
use palate_core::{FeatureVector, ProfileVector};

/// Fit a profile with the default backend and settings.
pub fn solve_profile(vectors: &[FeatureVector], deltas: &[f64]) -> PalateResult<ProfileVector> {
    ProfileSolver::new().solve_profile(vectors, deltas)
}
