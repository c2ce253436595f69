use crate::errors::PalateResult;
use crate::models::{CatalogItem, FeatureVector};

/// Read access to a system's catalog.
pub trait ICatalog: Send + Sync {
    /// Every item of `system`, in catalog order.
    fn items(&self, system: &str) -> PalateResult<Vec<CatalogItem>>;

    /// `(item id, feature vector)` pairs for `system`, in catalog order.
    fn feature_vectors(&self, system: &str) -> PalateResult<Vec<(String, FeatureVector)>> {
        Ok(self
            .items(system)?
            .into_iter()
            .map(|item| (item.id, item.feature_vector))
            .collect())
    }
}
