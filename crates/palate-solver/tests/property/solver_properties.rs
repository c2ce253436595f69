use palate_core::{FeatureVector, Preference, ProfileVector, RatingScale};
use palate_solver::delta::delta_for_rating;
use palate_solver::local_search::{coordinate_descent, total_error};
use palate_solver::{compute_deltas, estimate_rating, rating_for_delta, solve_profile};
use proptest::prelude::*;

fn arb_training_set(
    max_n: usize,
    max_m: usize,
) -> impl Strategy<Value = (Vec<FeatureVector>, Vec<f64>)> {
    (1..=max_n, 1..=max_m).prop_flat_map(|(n, m)| {
        (
            prop::collection::vec(prop::collection::vec(any::<bool>(), n), m),
            prop::collection::vec(0..=n, m),
        )
            .prop_map(|(rows, deltas)| {
                (
                    rows.into_iter().map(FeatureVector::from_bools).collect(),
                    deltas.into_iter().map(|d| d as f64).collect(),
                )
            })
    })
}

fn arb_preference() -> impl Strategy<Value = Preference> {
    prop_oneof![
        Just(Preference::Dislike),
        Just(Preference::Indifferent),
        Just(Preference::Like),
    ]
}

fn arb_profile_and_features() -> impl Strategy<Value = (ProfileVector, FeatureVector)> {
    (1usize..=24).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_preference(), n).prop_map(ProfileVector::new),
            prop::collection::vec(any::<bool>(), n).prop_map(FeatureVector::from_bools),
        )
    })
}

fn brute_force_optimum(vectors: &[FeatureVector], deltas: &[f64]) -> f64 {
    let n = vectors[0].len();
    let mut best = f64::INFINITY;
    for code in 0..3usize.pow(n as u32) {
        let mut rest = code;
        let profile: ProfileVector = (0..n)
            .map(|_| {
                let p = Preference::ALL[rest % 3];
                rest /= 3;
                p
            })
            .collect();
        best = best.min(total_error(&profile, vectors, deltas));
    }
    best
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn solved_profile_is_ternary_of_length_n((vectors, deltas) in arb_training_set(20, 8)) {
        let n = vectors[0].len();
        let profile = solve_profile(&vectors, &deltas).unwrap();
        prop_assert_eq!(profile.len(), n);
        prop_assert!(profile.to_values().iter().all(|v| (-1..=1).contains(v)));
    }

    #[test]
    fn solved_profile_never_loses_to_local_search(
        (vectors, deltas) in arb_training_set(20, 8),
    ) {
        let n = vectors[0].len();
        let exact = total_error(&solve_profile(&vectors, &deltas).unwrap(), &vectors, &deltas);
        let local = total_error(&coordinate_descent(&vectors, &deltas, n), &vectors, &deltas);
        prop_assert!(exact <= local + 1e-9, "exact {} local {}", exact, local);
    }

    #[test]
    fn solved_profile_is_optimal((vectors, deltas) in arb_training_set(7, 6)) {
        let profile = solve_profile(&vectors, &deltas).unwrap();
        let found = total_error(&profile, &vectors, &deltas);
        let optimum = brute_force_optimum(&vectors, &deltas);
        prop_assert!((found - optimum).abs() < 1e-9, "found {} optimum {}", found, optimum);
    }

    #[test]
    fn estimate_inverts_delta_transform(
        (profile, features) in arb_profile_and_features(),
        s in 2u32..=10,
    ) {
        let scale = RatingScale::new(f64::from(s)).unwrap();
        let n = profile.len();
        let k = profile.mismatch_count(&features);
        // The rating whose delta is exactly k.
        let x = rating_for_delta(k as f64, n, scale);
        let delta = compute_deltas(&[x], n, scale).unwrap()[0];
        prop_assert!((delta - k as f64).abs() < 1e-9);

        let estimate = estimate_rating(&profile, &features, n, scale).unwrap();
        prop_assert!((estimate - x).abs() < 1e-9);
        prop_assert!(estimate >= 1.0 - 1e-9 && estimate <= scale.max() + 1e-9);
    }

    #[test]
    fn deltas_stay_within_zero_and_n(r in 1.0f64..=5.0, n in 1usize..=40) {
        let d = delta_for_rating(r, n, RatingScale::default());
        prop_assert!(d >= -1e-9 && d <= n as f64 + 1e-9);
    }
}
