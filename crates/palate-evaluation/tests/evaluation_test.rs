use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use palate_core::config::{EvaluationConfig, SolverConfig};
use palate_core::errors::{EvaluationError, PalateError, ProfileError, SolverError};
use palate_core::{FeatureVector, RatingScale};
use palate_evaluation::{evaluate_mae, Evaluator};
use palate_solver::{BranchAndBound, IMipSolver, MipModel, MipSolution, ProfileSolver};
use test_fixtures::{load_catalog, load_scenario};

fn fv(bits: &[u8]) -> FeatureVector {
    FeatureVector::new(bits.to_vec()).unwrap()
}

fn labeled_items() -> (Vec<FeatureVector>, Vec<f64>) {
    let vectors = vec![
        fv(&[1, 0, 1, 0, 1, 0]),
        fv(&[0, 1, 1, 0, 0, 1]),
        fv(&[1, 1, 0, 0, 1, 1]),
        fv(&[0, 0, 0, 1, 1, 0]),
        fv(&[1, 0, 0, 1, 0, 1]),
        fv(&[0, 1, 0, 1, 1, 1]),
        fv(&[1, 1, 1, 1, 0, 0]),
        fv(&[0, 0, 1, 0, 0, 1]),
    ];
    let ratings = vec![5.0, 2.0, 4.0, 3.0, 4.5, 1.0, 3.5, 2.5];
    (vectors, ratings)
}

#[test]
fn default_plan_reports_four_sizes() {
    let (vectors, ratings) = labeled_items();
    let report = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(42)).unwrap();
    assert_eq!(report.train_sizes().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
    for (_, mae) in report.iter() {
        let mae = mae.expect("every size below 8 holds items out");
        assert!((0.0..=4.0).contains(&mae));
    }
}

#[test]
fn fixed_seed_is_deterministic() {
    let (vectors, ratings) = labeled_items();
    let a = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(7)).unwrap();
    let b = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(7)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn parallel_and_sequential_agree() {
    let (vectors, ratings) = labeled_items();
    let parallel = Evaluator::new(EvaluationConfig::seeded(11), RatingScale::default())
        .evaluate(&vectors, &ratings)
        .unwrap();
    let sequential = Evaluator::new(
        EvaluationConfig {
            parallel: false,
            ..EvaluationConfig::seeded(11)
        },
        RatingScale::default(),
    )
    .evaluate(&vectors, &ratings)
    .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn training_on_every_item_yields_none() {
    let (vectors, ratings) = labeled_items();
    let config = EvaluationConfig {
        train_sizes: vec![7, 8],
        trials: 2,
        ..EvaluationConfig::seeded(3)
    };
    let report = Evaluator::new(config, RatingScale::default())
        .evaluate(&vectors, &ratings)
        .unwrap();
    assert!(report.get(7).unwrap().is_some());
    assert_eq!(report.get(8), Some(None));
    assert_eq!(report.get(4), None);
}

#[test]
fn uniform_top_ratings_have_zero_error() {
    // Deltas are all zero; the search settles on indifference, which
    // predicts the top of the scale for every held-out item.
    let (vectors, _) = labeled_items();
    let ratings = vec![5.0; 8];
    let report = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(5)).unwrap();
    for (_, mae) in report.iter() {
        assert!(mae.unwrap() < 1e-9);
    }
}

#[test]
fn rounding_keeps_four_places() {
    let (vectors, ratings) = labeled_items();
    let report = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(42))
        .unwrap()
        .rounded(4);
    for (_, mae) in report.iter() {
        let mae = mae.unwrap();
        assert!((mae * 1e4 - (mae * 1e4).round()).abs() < 1e-6);
    }
}

#[test]
fn item_count_must_match() {
    let (mut vectors, ratings) = labeled_items();
    vectors.pop();
    let err = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(1)).unwrap_err();
    assert!(matches!(
        err,
        PalateError::Evaluation(EvaluationError::ItemCountMismatch { expected: 8, actual: 7, .. })
    ));

    let (vectors, mut ratings) = labeled_items();
    ratings.push(3.0);
    assert!(evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(1)).is_err());
}

#[test]
fn invalid_plans_are_rejected() {
    let (vectors, ratings) = labeled_items();
    let no_trials = EvaluationConfig {
        trials: 0,
        ..EvaluationConfig::default()
    };
    let err = Evaluator::new(no_trials, RatingScale::default())
        .evaluate(&vectors, &ratings)
        .unwrap_err();
    assert_eq!(err, PalateError::Evaluation(EvaluationError::NoTrials));

    let too_big = EvaluationConfig {
        train_sizes: vec![4, 9],
        ..EvaluationConfig::default()
    };
    let err = Evaluator::new(too_big, RatingScale::default())
        .evaluate(&vectors, &ratings)
        .unwrap_err();
    assert!(matches!(
        err,
        PalateError::Evaluation(EvaluationError::InvalidTrainSize { train_size: 9, item_count: 8 })
    ));
}

#[test]
fn inconsistent_dimensions_are_rejected_up_front() {
    let (mut vectors, ratings) = labeled_items();
    vectors[3] = fv(&[1, 0, 1]);
    let err = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(1)).unwrap_err();
    assert!(matches!(
        err,
        PalateError::Profile(ProfileError::DimensionMismatch { expected: 6, actual: 3, .. })
    ));
}

#[test]
fn report_serializes_as_size_keyed_map() {
    let (vectors, ratings) = labeled_items();
    let report = evaluate_mae(&vectors, &ratings, RatingScale::default(), Some(42)).unwrap();
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 4);
    assert!(object.contains_key("4") && object.contains_key("7"));
}

/// Bundled backend that tallies the nodes it explores.
#[derive(Default)]
struct NodeTally {
    solves: AtomicU64,
    nodes: AtomicU64,
    inner: BranchAndBound,
}

impl IMipSolver for NodeTally {
    fn name(&self) -> &str {
        "node-tally"
    }

    fn solve(&self, model: &MipModel) -> Result<MipSolution, SolverError> {
        let solution = self.inner.solve(model)?;
        self.solves.fetch_add(1, Ordering::Relaxed);
        self.nodes.fetch_add(solution.nodes, Ordering::Relaxed);
        Ok(solution)
    }
}

#[test]
fn twenty_feature_catalog_evaluates_within_node_budget() {
    let vectors: Vec<FeatureVector> = load_catalog("books")
        .feature_bits(12)
        .iter()
        .map(|bits| fv(bits))
        .collect();
    let ratings = load_scenario("dana_books").values();
    assert_eq!(vectors[0].len(), 20);

    let tally = Arc::new(NodeTally::default());
    let solver = ProfileSolver::with_backend(tally.clone(), SolverConfig::default());
    let config = EvaluationConfig {
        item_count: 12,
        train_sizes: vec![6, 8, 10],
        ..EvaluationConfig::seeded(2024)
    };
    let scale = RatingScale::new(7.0).unwrap();

    let started = Instant::now();
    let report = Evaluator::with_solver(solver, config, scale)
        .evaluate(&vectors, &ratings)
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.train_sizes().collect::<Vec<_>>(), vec![6, 8, 10]);
    for (_, mae) in report.iter() {
        assert!((0.0..=6.0).contains(&mae.unwrap()));
    }
    assert_eq!(tally.solves.load(Ordering::Relaxed), 30);
    let nodes = tally.nodes.load(Ordering::Relaxed);
    assert!(nodes <= 200_000, "explored {nodes} nodes over 30 fits");
    assert!(elapsed < Duration::from_secs(60), "took {elapsed:?}");
}
