pub mod catalog_item;
pub mod feature_vector;
pub mod profile_vector;
pub mod rating;

pub use catalog_item::CatalogItem;
pub use feature_vector::FeatureVector;
pub use profile_vector::{Preference, ProfileVector};
pub use rating::{RatingRecord, RatingScale};
