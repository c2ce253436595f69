use std::sync::Arc;

use palate_core::config::SolverConfig;
use palate_core::errors::{PalateResult, ProfileError};
use palate_core::{solve_span, FeatureVector, ProfileVector, RatingScale};
use tracing::{debug, error};

use crate::delta;
use crate::formulation::ProfileFormulation;
use crate::local_search;
use crate::mip::{BranchAndBound, IMipSolver};

/// Deltas this far outside `[0, n]` are clamped rather than rejected.
const DELTA_SLACK: f64 = 1e-9;

/// Result of one profile fit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSolution {
    pub profile: ProfileVector,
    /// `Σ_i |mismatch_i − δ_i|` at the returned profile.
    pub total_error: f64,
    /// Search nodes the backend explored.
    pub nodes: u64,
}

/// Fits ternary profiles to (feature vector, delta) training sets through an
/// [`IMipSolver`] backend. Clones share the backend.
#[derive(Clone)]
pub struct ProfileSolver {
    backend: Arc<dyn IMipSolver>,
    config: SolverConfig,
}

impl ProfileSolver {
    /// Bundled branch-and-bound with default settings.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            backend: Arc::new(BranchAndBound::with_tolerance(config.tolerance)),
            config,
        }
    }

    /// Use a different backend.
    pub fn with_backend(backend: Arc<dyn IMipSolver>, config: SolverConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fit a profile to `vectors` and their target mismatch counts.
    pub fn solve(
        &self,
        vectors: &[FeatureVector],
        deltas: &[f64],
    ) -> PalateResult<ProfileSolution> {
        let (n, deltas) = validate_training_set(vectors, deltas)?;
        let m = vectors.len();
        let _span = solve_span!(m, n).entered();

        let mut formulation = ProfileFormulation::build(vectors, &deltas);
        if self.config.warm_start {
            let seed = local_search::coordinate_descent(vectors, &deltas, n);
            debug!(
                warm_error = local_search::total_error(&seed, vectors, &deltas),
                "local search incumbent"
            );
            formulation.set_warm_start(&seed);
        }

        let solution = self.backend.solve(formulation.model()).map_err(|e| {
            error!(backend = self.backend.name(), m, n, error = %e, "profile solve failed");
            e
        })?;
        let profile = formulation.extract(&solution).map_err(|e| {
            error!(backend = self.backend.name(), m, n, error = %e, "profile solve failed");
            e
        })?;
        let total_error = local_search::total_error(&profile, vectors, &deltas);
        debug!(objective = total_error, nodes = solution.nodes, "profile solved");

        Ok(ProfileSolution {
            profile,
            total_error,
            nodes: solution.nodes,
        })
    }

    /// [`ProfileSolver::solve`], keeping only the profile.
    pub fn solve_profile(
        &self,
        vectors: &[FeatureVector],
        deltas: &[f64],
    ) -> PalateResult<ProfileVector> {
        self.solve(vectors, deltas).map(|s| s.profile)
    }

    /// Transform `ratings` on `scale` to deltas and fit.
    pub fn solve_ratings(
        &self,
        vectors: &[FeatureVector],
        ratings: &[f64],
        scale: RatingScale,
    ) -> PalateResult<ProfileSolution> {
        if vectors.is_empty() {
            return Err(ProfileError::EmptyTrainingSet.into());
        }
        let n = vectors[0].len();
        let deltas = delta::compute_deltas(ratings, n, scale)?;
        self.solve(vectors, &deltas)
    }
}

impl Default for ProfileSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `n` and the deltas clamped into `[0, n]`.
fn validate_training_set(
    vectors: &[FeatureVector],
    deltas: &[f64],
) -> Result<(usize, Vec<f64>), ProfileError> {
    if vectors.is_empty() {
        return Err(ProfileError::EmptyTrainingSet);
    }
    if deltas.len() != vectors.len() {
        return Err(ProfileError::dimension_mismatch("deltas", vectors.len(), deltas.len()));
    }
    let n = vectors[0].len();
    if n == 0 {
        return Err(ProfileError::EmptyFeatureVector);
    }
    if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != n) {
        return Err(ProfileError::dimension_mismatch(
            format!("feature vector {i}"),
            n,
            v.len(),
        ));
    }
    let upper = n as f64;
    deltas
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            if value.is_finite() && value >= -DELTA_SLACK && value <= upper + DELTA_SLACK {
                Ok(value.clamp(0.0, upper))
            } else {
                Err(ProfileError::InvalidDelta {
                    index,
                    value,
                    dimension: n,
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|deltas| (n, deltas))
}
