use palate_core::{FeatureVector, RatingScale};
use palate_evaluation::evaluate_mae;
use proptest::prelude::*;

fn arb_labeled_items() -> impl Strategy<Value = (Vec<FeatureVector>, Vec<f64>)> {
    (2usize..=6).prop_flat_map(|n| {
        (
            prop::collection::vec(
                prop::collection::vec(any::<bool>(), n).prop_map(FeatureVector::from_bools),
                8,
            ),
            prop::collection::vec(1u8..=5, 8).prop_map(|r| r.into_iter().map(f64::from).collect()),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn report_has_fixed_keys_and_bounded_values(
        (vectors, ratings) in arb_labeled_items(),
        seed in any::<u64>(),
    ) {
        let report = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(seed)).unwrap();
        prop_assert_eq!(report.train_sizes().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
        for (_, mae) in report.iter() {
            let mae = mae.unwrap();
            prop_assert!(mae >= 0.0 && mae <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn same_seed_same_report((vectors, ratings) in arb_labeled_items(), seed in any::<u64>()) {
        let a = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(seed)).unwrap();
        let b = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(seed)).unwrap();
        prop_assert_eq!(a, b);
    }
}
