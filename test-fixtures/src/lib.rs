//! Catalogs, rating scenarios and configuration shared by the Palate test
//! suites. Everything lives next to this crate's manifest.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A raw dataset plus the field mapping that normalises it.
/// `mapping` is kept as JSON so this crate stays independent of the
/// configuration types.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFixture {
    pub system: String,
    pub mapping: serde_json::Value,
    pub documents: Vec<serde_json::Value>,
}

impl CatalogFixture {
    /// Raw `0`/`1` feature vectors of the first `count` documents, read
    /// through the mapping's feature field.
    pub fn feature_bits(&self, count: usize) -> Vec<Vec<u8>> {
        let field = self.mapping["feature_vector"]
            .as_str()
            .unwrap_or("featureVector");
        self.documents
            .iter()
            .take(count)
            .map(|doc| {
                let bits = doc[field]
                    .as_array()
                    .unwrap_or_else(|| panic!("{}: document without {field}", self.system));
                bits.iter()
                    .map(|bit| bit.as_u64().map_or(0, |b| b as u8))
                    .collect()
            })
            .collect()
    }
}

/// One user's ratings for one system.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingScenario {
    pub description: String,
    pub system: String,
    pub user: String,
    pub max_rating: f64,
    pub ratings: Vec<ScenarioRating>,
    /// Whether some profile reproduces every rating exactly.
    #[serde(default)]
    pub consistent: bool,
}

impl RatingScenario {
    pub fn values(&self) -> Vec<f64> {
        self.ratings.iter().map(|r| r.value).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRating {
    pub item_id: String,
    pub value: f64,
}

/// Load `catalogs/<name>.json`.
pub fn load_catalog(name: &str) -> CatalogFixture {
    parse(&format!("catalogs/{name}.json"))
}

/// Load `scenarios/<name>.json`.
pub fn load_scenario(name: &str) -> RatingScenario {
    parse(&format!("scenarios/{name}.json"))
}

/// Raw text of `config/<name>.toml`.
pub fn load_config_text(name: &str) -> String {
    read(&format!("config/{name}.toml"))
}

fn path_of(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn read(relative: &str) -> String {
    let path = path_of(relative);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

fn parse<T: DeserializeOwned>(relative: &str) -> T {
    serde_json::from_str(&read(relative))
        .unwrap_or_else(|e| panic!("failed to parse fixture {relative}: {e}"))
}
