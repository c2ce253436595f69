use std::collections::BTreeMap;

use palate_solver::round_to;
use serde::Serialize;

/// Average held-out MAE per training-set size. `None` when no trial for that
/// size had a held-out item.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct MaeReport {
    entries: BTreeMap<usize, Option<f64>>,
}

impl MaeReport {
    pub fn new(entries: BTreeMap<usize, Option<f64>>) -> Self {
        Self { entries }
    }

    /// `None` if `train_size` was not evaluated.
    pub fn get(&self, train_size: usize) -> Option<Option<f64>> {
        self.entries.get(&train_size).copied()
    }

    pub fn train_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<f64>)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every average rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(&k, v)| (k, v.map(|mae| round_to(mae, decimals))))
                .collect(),
        }
    }

    pub fn into_map(self) -> BTreeMap<usize, Option<f64>> {
        self.entries
    }
}
