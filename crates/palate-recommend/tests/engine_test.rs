mod common;

use palate_core::errors::{CatalogError, PalateError, ProfileError};
use palate_core::traits::{IProfileStore, IRatingStore};
use palate_core::PalateConfig;
use palate_recommend::RecommendationEngine;
use test_fixtures::load_scenario;

use common::{fixture_config, ids, stores};

#[test]
fn consistent_scenario_reproduces_its_ratings() {
    let s = stores();
    let engine = RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, fixture_config())
        .unwrap();
    let scenario = load_scenario("alice_restaurants");
    assert!(scenario.consistent);
    assert_eq!(engine.scale().max(), scenario.max_rating);

    for r in &scenario.ratings {
        engine.rate(&scenario.user, &scenario.system, &r.item_id, r.value).unwrap();
    }
    let solution = engine.refresh_profile(&scenario.user, &scenario.system).unwrap();
    assert!(solution.total_error < 1e-9);
    assert_eq!(solution.profile.len(), 6);

    let stored = s.profiles.get(&scenario.user, &scenario.system).unwrap();
    assert_eq!(stored, Some(solution.profile));

    let rated: Vec<String> = scenario.ratings.iter().map(|r| r.item_id.clone()).collect();
    let estimates = engine
        .estimate_ratings(&scenario.user, &scenario.system, &rated)
        .unwrap();
    for r in &scenario.ratings {
        assert_eq!(estimates[&r.item_id], r.value, "{}", r.item_id);
    }
}

#[test]
fn twenty_feature_profile_is_refreshed_exactly() {
    let s = stores();
    let engine = RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, fixture_config())
        .unwrap();
    let scenario = load_scenario("dana_books");
    assert!(!scenario.consistent);
    for r in &scenario.ratings {
        engine.rate(&scenario.user, &scenario.system, &r.item_id, r.value).unwrap();
    }
    let solution = engine.refresh_profile(&scenario.user, &scenario.system).unwrap();
    assert_eq!(solution.profile.len(), 20);
    assert!((solution.total_error - 15.0).abs() < 1e-9);
    assert!(solution.nodes <= 50_000, "explored {} nodes", solution.nodes);

    let recs = engine.recommend(&scenario.user, &scenario.system).unwrap();
    assert_eq!(recs.len(), 5);
    assert!(recs.iter().all(|r| (1.0..=7.0).contains(&r.predicted_rating)));
}

#[test]
fn recommendations_are_ranked_and_limited() {
    let s = stores();
    let engine = RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, fixture_config())
        .unwrap();
    let scenario = load_scenario("alice_restaurants");
    for r in &scenario.ratings {
        engine.rate(&scenario.user, &scenario.system, &r.item_id, r.value).unwrap();
    }
    engine.refresh_profile(&scenario.user, &scenario.system).unwrap();

    let recs = engine.recommend(&scenario.user, &scenario.system).unwrap();
    assert_eq!(recs.len(), 5);
    for pair in recs.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.predicted_rating > b.predicted_rating
                || (a.predicted_rating == b.predicted_rating && a.item_id < b.item_id)
        );
    }
    // r01 matches the profile that reproduces every rating, so it scores 7.
    assert_eq!(recs[0].predicted_rating, 7.0);
    assert!(recs.iter().all(|r| (1.0..=7.0).contains(&r.predicted_rating)));
}

#[test]
fn missing_profile_is_recoverable_and_distinct_from_solver_failure() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    let err = engine.recommend("nobody", "movies").unwrap_err();
    assert!(matches!(err, PalateError::Profile(ProfileError::NoProfile { .. })));
    assert!(err.is_recoverable());
    assert!(!err.is_solver_failure());
}

#[test]
fn too_few_ratings_store_nothing() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    let scenario = load_scenario("carol_too_few");
    for r in &scenario.ratings {
        engine.rate(&scenario.user, &scenario.system, &r.item_id, r.value).unwrap();
    }
    let err = engine.refresh_profile(&scenario.user, &scenario.system).unwrap_err();
    assert_eq!(
        err,
        PalateError::Profile(ProfileError::InsufficientRatings {
            required: 4,
            available: 3
        })
    );
    assert!(err.is_recoverable());
    assert!(s.profiles.is_empty());
}

#[test]
fn ratings_for_unknown_items_do_not_count() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    let ratings = vec![
        ("m01".to_string(), 5.0),
        ("m02".to_string(), 1.0),
        ("m03".to_string(), 4.0),
        ("gone-1".to_string(), 2.0),
        ("gone-2".to_string(), 3.0),
    ];
    let err = engine.profile_from_ratings("movies", &ratings).unwrap_err();
    assert!(matches!(
        err,
        PalateError::Profile(ProfileError::InsufficientRatings { available: 3, .. })
    ));
}

#[test]
fn privacy_mode_leaves_stores_untouched() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    let ratings = vec![
        ("m01".to_string(), 5.0),
        ("m02".to_string(), 1.0),
        ("m03".to_string(), 4.0),
        ("m04".to_string(), 3.0),
    ];
    let solution = engine.profile_from_ratings("movies", &ratings).unwrap();
    assert_eq!(solution.profile.len(), 5);
    assert!(s.ratings.ratings("dave", "movies").unwrap().is_empty());
    assert!(s.profiles.is_empty());

    let recs = engine.recommend_for_profile("movies", &solution.profile).unwrap();
    assert_eq!(recs.len(), 10);
    assert!(s.profiles.is_empty());
}

#[test]
fn rate_validates_scale_and_item() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    let err = engine.rate("erin", "movies", "m01", 6.0).unwrap_err();
    assert!(matches!(err, PalateError::Profile(ProfileError::InvalidRating { .. })));

    let err = engine.rate("erin", "movies", "m99", 3.0).unwrap_err();
    assert!(matches!(err, PalateError::Catalog(CatalogError::UnknownItem { .. })));

    let err = engine.rate("erin", "nowhere", "m01", 3.0).unwrap_err();
    assert!(matches!(err, PalateError::Catalog(CatalogError::UnknownSystem { .. })));
    assert!(s.ratings.ratings("erin", "movies").unwrap().is_empty());
}

#[test]
fn later_rating_overwrites_earlier() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    let first = engine.rate("frank", "movies", "m01", 2.0).unwrap();
    let second = engine.rate("frank", "movies", "m01", 4.5).unwrap();
    assert!(second.rated_at >= first.rated_at);

    let stored = s.ratings.ratings("frank", "movies").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].value, 4.5);
}

#[test]
fn reset_clears_ratings_and_profile() {
    let s = stores();
    let engine = RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, fixture_config())
        .unwrap();
    let scenario = load_scenario("alice_restaurants");
    for r in &scenario.ratings {
        engine.rate(&scenario.user, &scenario.system, &r.item_id, r.value).unwrap();
    }
    engine.refresh_profile(&scenario.user, &scenario.system).unwrap();

    let removed = engine.reset(&scenario.user, &scenario.system).unwrap();
    assert_eq!(removed, scenario.ratings.len());
    assert!(s.ratings.ratings(&scenario.user, &scenario.system).unwrap().is_empty());
    let err = engine.recommend(&scenario.user, &scenario.system).unwrap_err();
    assert!(matches!(err, PalateError::Profile(ProfileError::NoProfile { .. })));
    assert_eq!(engine.reset(&scenario.user, &scenario.system).unwrap(), 0);
}

#[test]
fn estimates_skip_unknown_ids_and_round() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    for (id, v) in [("m01", 5.0), ("m02", 1.0), ("m03", 4.0), ("m04", 2.0), ("m07", 3.0)] {
        engine.rate("gina", "movies", id, v).unwrap();
    }
    let estimates = engine
        .estimate_ratings("gina", "movies", &ids(&["m05", "m06", "nope"]))
        .unwrap();
    assert_eq!(estimates.len(), 2);
    assert!(!estimates.contains_key("nope"));
    for value in estimates.values() {
        assert!((1.0..=5.0).contains(value));
        assert!((value * 100.0 - (value * 100.0).round()).abs() < 1e-9);
    }
    // Estimating does not persist a profile.
    assert!(s.profiles.is_empty());
}

#[test]
fn evaluation_by_item_id() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    let scenario = load_scenario("bob_eight_items");
    let item_ids: Vec<String> = scenario.ratings.iter().map(|r| r.item_id.clone()).collect();
    let values: Vec<f64> = scenario.ratings.iter().map(|r| r.value).collect();

    let report = engine.evaluate("restaurants", &item_ids, &values, Some(99)).unwrap();
    assert_eq!(report.train_sizes().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
    for (_, mae) in report.iter() {
        let mae = mae.unwrap();
        assert!((0.0..=4.0).contains(&mae));
        assert!((mae * 1e4 - (mae * 1e4).round()).abs() < 1e-6);
    }
    let again = engine.evaluate("restaurants", &item_ids, &values, Some(99)).unwrap();
    assert_eq!(report, again);

    let mut bad_ids = item_ids.clone();
    bad_ids[2] = "r404".to_string();
    let err = engine.evaluate("restaurants", &bad_ids, &values, Some(99)).unwrap_err();
    assert!(matches!(err, PalateError::Catalog(CatalogError::UnknownItem { .. })));
}

#[test]
fn invalid_scale_is_rejected_at_construction() {
    let s = stores();
    let mut config = PalateConfig::default();
    config.scale.max_rating = 1.0;
    let err = RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, config)
        .err()
        .unwrap();
    assert!(matches!(err, PalateError::Profile(ProfileError::InvalidScale { .. })));
}
