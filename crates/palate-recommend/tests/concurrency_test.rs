mod common;

use std::sync::{Barrier, Mutex};
use std::thread;

use palate_core::traits::{IProfileStore, IRatingStore};
use palate_core::PalateConfig;
use palate_recommend::RecommendationEngine;

use common::stores;

const THREADS: usize = 8;

/// Four ratings on the movie catalog, shifted per thread so the fitted
/// profiles differ.
fn ratings_for(thread: usize) -> Vec<(String, f64)> {
    let ids = ["m01", "m02", "m03", "m04", "m07", "m09"];
    (0..4)
        .map(|k| {
            let id = ids[(thread + k) % ids.len()];
            let value = 1.0 + ((thread * 3 + k) % 5) as f64;
            (id.to_string(), value)
        })
        .collect()
}

#[test]
fn concurrent_solves_for_one_user_keep_the_last_write() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    let barrier = Barrier::new(THREADS);
    let write_order = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for t in 0..THREADS {
            let engine = &engine;
            let barrier = &barrier;
            let write_order = &write_order;
            let profiles = &s.profiles;
            scope.spawn(move || {
                barrier.wait();
                let solution = engine.profile_from_ratings("movies", &ratings_for(t)).unwrap();
                // Serialise only the write so the order is observable.
                let mut order = write_order.lock().unwrap();
                profiles.put("shared", "movies", solution.profile.clone()).unwrap();
                order.push(solution.profile);
            });
        }
    });

    let order = write_order.into_inner().unwrap();
    assert_eq!(order.len(), THREADS);
    let stored = s.profiles.get("shared", "movies").unwrap();
    assert_eq!(stored.as_ref(), order.last());
    assert_eq!(s.profiles.len(), 1);
}

#[test]
fn racing_refreshes_leave_one_complete_profile() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    for (id, v) in [("m01", 5.0), ("m02", 1.0), ("m03", 4.0), ("m04", 2.0)] {
        engine.rate("race", "movies", id, v).unwrap();
    }
    let barrier = Barrier::new(THREADS);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let engine = &engine;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    engine.refresh_profile("race", "movies").unwrap().profile
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let stored = s.profiles.get("race", "movies").unwrap().unwrap();
    assert_eq!(stored.len(), 5);
    assert!(results.contains(&stored));
}

#[test]
fn racing_rating_upserts_keep_one_record_per_item() {
    let s = stores();
    let engine =
        RecommendationEngine::new(&s.catalog, &s.ratings, &s.profiles, PalateConfig::default())
            .unwrap();
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for t in 0..THREADS {
            let engine = &engine;
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                let value = 1.0 + (t % 5) as f64;
                engine.rate("hana", "movies", "m01", value).unwrap();
                engine.rate("hana", "movies", "m02", value).unwrap();
            });
        }
    });

    let stored = s.ratings.ratings("hana", "movies").unwrap();
    assert_eq!(stored.len(), 2);
    for record in stored {
        assert!((1.0..=5.0).contains(&record.value));
    }
}
