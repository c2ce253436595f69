//! In-memory collaborators backed by `DashMap`. Writers to the same key race
//! freely; the last write wins.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use palate_core::errors::{CatalogError, PalateResult};
use palate_core::traits::{ICatalog, IProfileStore, IRatingStore};
use palate_core::{CatalogItem, ProfileVector, RatingRecord};

type UserSystem = (String, String);

fn key(user: &str, system: &str) -> UserSystem {
    (user.to_string(), system.to_string())
}

/// Catalogs keyed by system id.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    systems: Arc<DashMap<String, Vec<CatalogItem>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the items of `system`.
    pub fn insert_system(&self, system: impl Into<String>, items: Vec<CatalogItem>) {
        self.systems.insert(system.into(), items);
    }

    pub fn system_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.systems.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }
}

impl ICatalog for InMemoryCatalog {
    fn items(&self, system: &str) -> PalateResult<Vec<CatalogItem>> {
        self.systems
            .get(system)
            .map(|items| items.clone())
            .ok_or_else(|| {
                CatalogError::UnknownSystem {
                    system: system.to_string(),
                }
                .into()
            })
    }
}

/// Ratings keyed by (user, system), then item id.
#[derive(Clone, Default)]
pub struct InMemoryRatingStore {
    ratings: Arc<DashMap<UserSystem, HashMap<String, RatingRecord>>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IRatingStore for InMemoryRatingStore {
    /// Sorted by item id.
    fn ratings(&self, user: &str, system: &str) -> PalateResult<Vec<RatingRecord>> {
        let mut records: Vec<RatingRecord> = self
            .ratings
            .get(&key(user, system))
            .map(|r| r.values().cloned().collect())
            .unwrap_or_default();
        records.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        Ok(records)
    }

    fn upsert(&self, user: &str, system: &str, record: RatingRecord) -> PalateResult<()> {
        self.ratings
            .entry(key(user, system))
            .or_default()
            .insert(record.item_id.clone(), record);
        Ok(())
    }

    fn remove(&self, user: &str, system: &str, item_id: &str) -> PalateResult<bool> {
        Ok(self
            .ratings
            .get_mut(&key(user, system))
            .is_some_and(|mut r| r.remove(item_id).is_some()))
    }

    fn clear(&self, user: &str, system: &str) -> PalateResult<usize> {
        Ok(self
            .ratings
            .remove(&key(user, system))
            .map_or(0, |(_, r)| r.len()))
    }
}

/// Profiles keyed by (user, system).
#[derive(Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<DashMap<UserSystem, ProfileVector>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl IProfileStore for InMemoryProfileStore {
    fn get(&self, user: &str, system: &str) -> PalateResult<Option<ProfileVector>> {
        Ok(self.profiles.get(&key(user, system)).map(|p| p.clone()))
    }

    fn put(&self, user: &str, system: &str, profile: ProfileVector) -> PalateResult<()> {
        self.profiles.insert(key(user, system), profile);
        Ok(())
    }

    fn remove(&self, user: &str, system: &str) -> PalateResult<bool> {
        Ok(self.profiles.remove(&key(user, system)).is_some())
    }
}
