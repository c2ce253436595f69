use palate_core::models::{FeatureVector, Preference, ProfileVector};
use proptest::prelude::*;

fn arb_preference() -> impl Strategy<Value = Preference> {
    prop_oneof![
        Just(Preference::Dislike),
        Just(Preference::Indifferent),
        Just(Preference::Like),
    ]
}

fn arb_pair() -> impl Strategy<Value = (ProfileVector, FeatureVector)> {
    (1usize..24).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_preference(), n),
            prop::collection::vec(any::<bool>(), n),
        )
            .prop_map(|(p, f)| (ProfileVector::new(p), FeatureVector::from_bools(f)))
    })
}

proptest! {
    #[test]
    fn mismatch_count_never_exceeds_dimension((profile, features) in arb_pair()) {
        prop_assert!(profile.mismatch_count(&features) <= features.len());
    }

    #[test]
    fn indifferent_profile_never_mismatches(bits in prop::collection::vec(any::<bool>(), 1..24)) {
        let features = FeatureVector::from_bools(bits);
        let profile = ProfileVector::indifferent(features.len());
        prop_assert_eq!(profile.mismatch_count(&features), 0);
    }

    #[test]
    fn mirrored_profile_mismatches_everywhere(bits in prop::collection::vec(any::<bool>(), 1..24)) {
        // Like every absent feature, dislike every present one.
        let features = FeatureVector::from_bools(bits);
        let profile: ProfileVector = features
            .iter()
            .map(|present| if present { Preference::Dislike } else { Preference::Like })
            .collect();
        prop_assert_eq!(profile.mismatch_count(&features), features.len());
    }
}
