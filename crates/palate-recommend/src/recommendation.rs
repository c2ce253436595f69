use serde::{Deserialize, Serialize};

/// One ranked catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: String,
    pub name: String,
    pub image: String,
    pub predicted_rating: f64,
}
