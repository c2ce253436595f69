//! # palate-evaluation
//!
//! Diagnostic cross-validation: for each training-set size, fit profiles on
//! random subsets of a labeled item set and average the held-out MAE.

pub mod evaluator;
pub mod report;
pub mod split;

pub use evaluator::{evaluate_mae, Evaluator};
pub use report::MaeReport;
pub use split::Split;
