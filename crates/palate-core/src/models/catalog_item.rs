use serde::{Deserialize, Serialize};

use crate::models::FeatureVector;

/// A normalised catalog entry. Display fields are carried for the
/// collaborator; only `feature_vector` takes part in scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub feature_vector: FeatureVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl CatalogItem {
    /// An item with only an id and features; display fields take their defaults.
    pub fn new(id: impl Into<String>, feature_vector: FeatureVector) -> Self {
        Self {
            id: id.into(),
            name: "Unknown".to_string(),
            description: String::new(),
            image: String::new(),
            feature_vector,
            latitude: None,
            longitude: None,
        }
    }
}
