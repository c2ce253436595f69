#![allow(dead_code)]

use palate_core::config::FieldMapping;
use palate_core::PalateConfig;
use palate_recommend::{normalize, InMemoryCatalog, InMemoryProfileStore, InMemoryRatingStore};
use test_fixtures::{load_catalog, load_config_text};

pub struct Stores {
    pub catalog: InMemoryCatalog,
    pub ratings: InMemoryRatingStore,
    pub profiles: InMemoryProfileStore,
}

/// Collaborators with the restaurant, movie and book fixture catalogs loaded.
pub fn stores() -> Stores {
    let catalog = InMemoryCatalog::new();
    for name in ["restaurants", "movies", "books"] {
        let fixture = load_catalog(name);
        let mapping: FieldMapping = serde_json::from_value(fixture.mapping).unwrap();
        catalog.insert_system(fixture.system, normalize(&fixture.documents, &mapping).unwrap());
    }
    Stores {
        catalog,
        ratings: InMemoryRatingStore::new(),
        profiles: InMemoryProfileStore::new(),
    }
}

/// The fixture config: 1..7 scale, five recommendations, seeded evaluation.
pub fn fixture_config() -> PalateConfig {
    PalateConfig::from_toml(&load_config_text("palate")).unwrap()
}

pub fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}
