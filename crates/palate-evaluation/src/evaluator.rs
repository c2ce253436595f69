use std::collections::BTreeMap;

use palate_core::config::EvaluationConfig;
use palate_core::errors::{EvaluationError, PalateResult, ProfileError};
use palate_core::{evaluation_span, FeatureVector, RatingScale};
use palate_solver::{compute_deltas, estimate_rating, ProfileSolver};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::report::MaeReport;
use crate::split::{self, Split};

/// Cross-validates profile fits over a fixed labeled item set.
pub struct Evaluator {
    solver: ProfileSolver,
    config: EvaluationConfig,
    scale: RatingScale,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig, scale: RatingScale) -> Self {
        Self::with_solver(ProfileSolver::new(), config, scale)
    }

    pub fn with_solver(
        solver: ProfileSolver,
        config: EvaluationConfig,
        scale: RatingScale,
    ) -> Self {
        Self {
            solver,
            config,
            scale,
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// MAE per configured train size over `trials` random splits each.
    ///
    /// Averages are unrounded; see [`MaeReport::rounded`].
    pub fn evaluate(&self, vectors: &[FeatureVector], ratings: &[f64]) -> PalateResult<MaeReport> {
        let n = self.validate(vectors, ratings)?;
        let config = &self.config;
        let _span = evaluation_span!(config.item_count, config.trials).entered();

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let splits = split::plan(&mut rng, config.item_count, &config.train_sizes, config.trials);

        let trials: Vec<Option<f64>> = if config.parallel {
            splits
                .par_iter()
                .map(|s| self.run_trial(s, vectors, ratings, n))
                .collect::<PalateResult<_>>()?
        } else {
            splits
                .iter()
                .map(|s| self.run_trial(s, vectors, ratings, n))
                .collect::<PalateResult<_>>()?
        };

        let mut per_size: BTreeMap<usize, Vec<f64>> =
            config.train_sizes.iter().map(|&k| (k, Vec::new())).collect();
        for (s, mae) in splits.iter().zip(trials) {
            if let (Some(mae), Some(bucket)) = (mae, per_size.get_mut(&s.train_size)) {
                bucket.push(mae);
            }
        }
        let report = MaeReport::new(
            per_size
                .into_iter()
                .map(|(k, maes)| {
                    let average = (!maes.is_empty())
                        .then(|| maes.iter().sum::<f64>() / maes.len() as f64);
                    (k, average)
                })
                .collect(),
        );
        info!(
            sizes = report.len(),
            splits = splits.len(),
            parallel = config.parallel,
            "cross-validation finished"
        );
        Ok(report)
    }

    /// Fit on the split's training items and return the mean absolute error
    /// on the rest, or `None` if nothing is held out.
    fn run_trial(
        &self,
        split: &Split,
        vectors: &[FeatureVector],
        ratings: &[f64],
        n: usize,
    ) -> PalateResult<Option<f64>> {
        if split.test.is_empty() {
            return Ok(None);
        }
        let train_vectors: Vec<FeatureVector> =
            split.train.iter().map(|&i| vectors[i].clone()).collect();
        let train_ratings: Vec<f64> = split.train.iter().map(|&i| ratings[i]).collect();
        let deltas = compute_deltas(&train_ratings, n, self.scale)?;
        let profile = self.solver.solve_profile(&train_vectors, &deltas)?;

        let mut total = 0.0;
        for &i in &split.test {
            let predicted = estimate_rating(&profile, &vectors[i], n, self.scale)?;
            total += (ratings[i] - predicted).abs();
        }
        let mae = total / split.test.len() as f64;
        debug!(train_size = split.train_size, mae, "trial scored");
        Ok(Some(mae))
    }

    /// Returns `n`.
    fn validate(&self, vectors: &[FeatureVector], ratings: &[f64]) -> PalateResult<usize> {
        let config = &self.config;
        if config.trials == 0 {
            return Err(EvaluationError::NoTrials.into());
        }
        if let Some(&k) = config
            .train_sizes
            .iter()
            .find(|&&k| k == 0 || k > config.item_count)
        {
            return Err(EvaluationError::InvalidTrainSize {
                train_size: k,
                item_count: config.item_count,
            }
            .into());
        }
        if vectors.len() != config.item_count {
            return Err(EvaluationError::ItemCountMismatch {
                what: "item vectors".to_string(),
                expected: config.item_count,
                actual: vectors.len(),
            }
            .into());
        }
        if ratings.len() != config.item_count {
            return Err(EvaluationError::ItemCountMismatch {
                what: "ratings".to_string(),
                expected: config.item_count,
                actual: ratings.len(),
            }
            .into());
        }
        let n = vectors.first().map_or(0, FeatureVector::len);
        if n == 0 {
            return Err(ProfileError::EmptyFeatureVector.into());
        }
        if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != n) {
            return Err(
                ProfileError::dimension_mismatch(format!("feature vector {i}"), n, v.len()).into(),
            );
        }
        for &r in ratings {
            self.scale.validate(r)?;
        }
        Ok(n)
    }
}

/// Cross-validate with the default plan: 8 items, train sizes 4 to 7,
/// 10 trials each. `seed` pins the splits.
pub fn evaluate_mae(
    vectors: &[FeatureVector],
    ratings: &[f64],
    scale: RatingScale,
    seed: Option<u64>,
) -> PalateResult<MaeReport> {
    let config = EvaluationConfig {
        seed,
        ..EvaluationConfig::default()
    };
    Evaluator::new(config, scale).evaluate(vectors, ratings)
}
