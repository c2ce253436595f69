//! # palate-recommend
//!
//! The live path around the solver. [`RecommendationEngine`] reads ratings
//! and catalogs through the `palate-core` collaborator traits, fits and
//! persists profiles, and ranks items. [`catalog::normalize`] turns raw
//! dataset documents into catalog items; [`memory`] holds `dashmap`-backed
//! collaborators.

pub mod catalog;
pub mod engine;
pub mod memory;
pub mod recommendation;

pub use catalog::{normalize, normalize_json};
pub use engine::RecommendationEngine;
pub use memory::{InMemoryCatalog, InMemoryProfileStore, InMemoryRatingStore};
pub use recommendation::Recommendation;
