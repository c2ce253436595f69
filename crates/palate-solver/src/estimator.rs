use palate_core::errors::ProfileError;
use palate_core::{estimate_span, FeatureVector, ProfileVector, RatingScale};

use crate::delta;

/// Predicted rating of an item: `s − mismatch·(s − 1)/n`.
///
/// Both vectors must have exactly `n` entries.
pub fn estimate_rating(
    profile: &ProfileVector,
    features: &FeatureVector,
    n: usize,
    scale: RatingScale,
) -> Result<f64, ProfileError> {
    check_dimensions(profile, n)?;
    if features.len() != n {
        return Err(ProfileError::dimension_mismatch("feature vector", n, features.len()));
    }
    let mismatch = profile.mismatch_count(features);
    Ok(delta::rating_for_delta(mismatch as f64, n, scale))
}

/// [`estimate_rating`] over a batch of items, in input order.
pub fn estimate_ratings(
    profile: &ProfileVector,
    items: &[FeatureVector],
    n: usize,
    scale: RatingScale,
) -> Result<Vec<f64>, ProfileError> {
    let _span = estimate_span!(n).entered();
    check_dimensions(profile, n)?;
    items
        .iter()
        .map(|features| estimate_rating(profile, features, n, scale))
        .collect()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn check_dimensions(profile: &ProfileVector, n: usize) -> Result<(), ProfileError> {
    if n == 0 {
        return Err(ProfileError::EmptyFeatureVector);
    }
    if profile.len() != n {
        return Err(ProfileError::dimension_mismatch("profile", n, profile.len()));
    }
    Ok(())
}
