/// Lowest rating on every scale.
pub const MIN_RATING: f64 = 1.0;

/// Default top of the rating scale (`s`).
pub const DEFAULT_MAX_RATING: f64 = 5.0;

/// Ratings a user must have before a profile is solved for them.
pub const DEFAULT_MIN_RATINGS: usize = 4;

/// Number of recommendations returned when the caller does not ask for a limit.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// Decimal places kept on per-item rating estimates.
pub const DEFAULT_ESTIMATE_DECIMALS: u32 = 2;

/// Labeled items taken by one cross-validation run.
pub const EVALUATION_ITEM_COUNT: usize = 8;

/// Training-set sizes scored by one cross-validation run.
pub const EVALUATION_TRAIN_SIZES: [usize; 4] = [4, 5, 6, 7];

/// Random splits averaged per training-set size.
pub const EVALUATION_TRIALS: usize = 10;

/// Decimal places kept on reported MAE averages.
pub const DEFAULT_MAE_DECIMALS: u32 = 4;

/// Numerical tolerance used by the MIP backend.
pub const DEFAULT_SOLVER_TOLERANCE: f64 = 1e-9;
