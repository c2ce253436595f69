//! Greedy coordinate descent over ternary profiles, used to seed the exact
//! search with a good incumbent.

use palate_core::{FeatureVector, Preference, ProfileVector};

const MAX_PASSES: usize = 64;

/// `Σ_i |mismatch(profile, vectors[i]) − deltas[i]|`.
pub fn total_error(profile: &ProfileVector, vectors: &[FeatureVector], deltas: &[f64]) -> f64 {
    vectors
        .iter()
        .zip(deltas)
        .map(|(features, &delta)| (profile.mismatch_count(features) as f64 - delta).abs())
        .sum()
}

/// Start from the indifferent profile and repeatedly apply the single-feature
/// change that lowers [`total_error`] most, until no change helps.
pub fn coordinate_descent(vectors: &[FeatureVector], deltas: &[f64], n: usize) -> ProfileVector {
    let mut profile = vec![Preference::Indifferent; n];
    let mut mismatches = vec![0i64; vectors.len()];
    let mut error: f64 = deltas.iter().map(|d| d.abs()).sum();

    for _ in 0..MAX_PASSES {
        let mut best: Option<(usize, Preference, f64)> = None;
        for (j, &current) in profile.iter().enumerate() {
            for candidate in Preference::ALL {
                if candidate == current {
                    continue;
                }
                let candidate_error: f64 = vectors
                    .iter()
                    .zip(deltas)
                    .zip(&mismatches)
                    .map(|((features, &delta), &m)| {
                        let present = features.has(j);
                        let shifted = m - i64::from(current.contradicts(present))
                            + i64::from(candidate.contradicts(present));
                        (shifted as f64 - delta).abs()
                    })
                    .sum();
                let threshold = best.map_or(error, |(_, _, e)| e);
                if candidate_error < threshold - 1e-12 {
                    best = Some((j, candidate, candidate_error));
                }
            }
        }
        let Some((j, candidate, candidate_error)) = best else {
            break;
        };
        for (features, m) in vectors.iter().zip(mismatches.iter_mut()) {
            let present = features.has(j);
            *m += i64::from(candidate.contradicts(present))
                - i64::from(profile[j].contradicts(present));
        }
        profile[j] = candidate;
        error = candidate_error;
    }

    ProfileVector::new(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(bits: &[u8]) -> FeatureVector {
        FeatureVector::new(bits.to_vec()).unwrap()
    }

    #[test]
    fn finds_exact_fit_when_one_exists() {
        let vectors = [fv(&[0, 1, 0]), fv(&[1, 0, 1])];
        let deltas = [0.0, 3.0];
        let profile = coordinate_descent(&vectors, &deltas, 3);
        assert_eq!(total_error(&profile, &vectors, &deltas), 0.0);
    }

    #[test]
    fn never_worse_than_indifferent() {
        let vectors = [fv(&[1, 1, 0, 0]), fv(&[0, 1, 1, 0]), fv(&[1, 0, 0, 1])];
        let deltas = [2.0, 1.0, 4.0];
        let profile = coordinate_descent(&vectors, &deltas, 4);
        let baseline = total_error(&ProfileVector::indifferent(4), &vectors, &deltas);
        assert!(total_error(&profile, &vectors, &deltas) <= baseline);
        assert_eq!(profile.len(), 4);
    }

    #[test]
    fn all_zero_deltas_keep_indifference() {
        let vectors = [fv(&[1, 0]), fv(&[0, 1])];
        let profile = coordinate_descent(&vectors, &[0.0, 0.0], 2);
        assert_eq!(profile, ProfileVector::indifferent(2));
    }
}
