use serde::{Deserialize, Serialize};

/// A catalog ("system") and how its raw documents map onto catalog items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub mapping: FieldMapping,
}

/// Source field names for each catalog-item field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub feature_vector: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            name: "name".to_string(),
            description: "description".to_string(),
            image: "image".to_string(),
            feature_vector: "featureVector".to_string(),
            latitude: None,
            longitude: None,
        }
    }
}
