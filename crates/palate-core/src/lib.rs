//! # palate-core
//!
//! Foundation crate for the Palate preference engine.
//! Defines the feature/profile/rating types, collaborator traits, errors,
//! config, tracing setup, and constants. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::PalateConfig;
pub use errors::{PalateError, PalateResult};
pub use models::{
    CatalogItem, FeatureVector, Preference, ProfileVector, RatingRecord, RatingScale,
};
