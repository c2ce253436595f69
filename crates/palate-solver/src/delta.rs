//! Rating ⇄ target-mismatch transform.
//!
//! `d = n − n·(r − 1)/(s − 1)`, so `r = s` maps to `0` and `r = 1` maps to `n`.
//! [`rating_for_delta`] is its exact inverse and is what the estimator applies
//! to a mismatch count.

use palate_core::errors::ProfileError;
use palate_core::RatingScale;

/// Convert ratings on `scale` to target mismatch counts for an `n`-feature catalog.
pub fn compute_deltas(
    ratings: &[f64],
    n: usize,
    scale: RatingScale,
) -> Result<Vec<f64>, ProfileError> {
    if n == 0 {
        return Err(ProfileError::EmptyFeatureVector);
    }
    ratings
        .iter()
        .map(|&r| scale.validate(r).map(|r| delta_for_rating(r, n, scale)))
        .collect()
}

/// Single-rating form of [`compute_deltas`]. The rating is not validated.
pub fn delta_for_rating(rating: f64, n: usize, scale: RatingScale) -> f64 {
    let n = n as f64;
    n - n * (rating - scale.min()) / scale.span()
}

/// Inverse transform: the rating whose delta is `delta`.
pub fn rating_for_delta(delta: f64, n: usize, scale: RatingScale) -> f64 {
    scale.max() - delta * scale.span() / n as f64
}
