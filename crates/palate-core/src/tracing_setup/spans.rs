//! Span definitions per operation: solve, estimate, evaluation, recommend.
//!
//! Each span carries the operation's sizing metadata via the `tracing` crate.

/// Create a profile-solve span.
#[macro_export]
macro_rules! solve_span {
    ($items:expr, $features:expr) => {
        tracing::info_span!("palate.solve", m = $items, n = $features)
    };
}

/// Create a rating-estimate span.
#[macro_export]
macro_rules! estimate_span {
    ($features:expr) => {
        tracing::debug_span!("palate.estimate", n = $features)
    };
}

/// Create a cross-validation span.
#[macro_export]
macro_rules! evaluation_span {
    ($items:expr, $trials:expr) => {
        tracing::info_span!("palate.evaluation", items = $items, trials = $trials)
    };
}

/// Create a recommendation span.
#[macro_export]
macro_rules! recommend_span {
    ($user:expr, $system:expr) => {
        tracing::info_span!("palate.recommend", user = %$user, system = %$system)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SOLVE: &str = "palate.solve";
    pub const ESTIMATE: &str = "palate.estimate";
    pub const EVALUATION: &str = "palate.evaluation";
    pub const RECOMMEND: &str = "palate.recommend";
}
