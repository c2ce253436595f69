use serde::{Deserialize, Serialize};

use crate::errors::ProfileError;

/// Fixed-length presence/absence encoding of an item's attributes.
///
/// Serializes as a JSON array of `0`/`1` integers so catalog documents
/// round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<u8>")]
pub struct FeatureVector {
    bits: Vec<bool>,
}

impl FeatureVector {
    /// Build from `0`/`1` values, rejecting anything else.
    pub fn new(values: Vec<u8>) -> Result<Self, ProfileError> {
        let bits = values
            .into_iter()
            .enumerate()
            .map(|(index, v)| match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(ProfileError::InvalidFeatureValue {
                    index,
                    value: i64::from(other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }

    pub fn from_bools(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Number of features, `n`.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether feature `index` is present. Panics when out of range.
    pub fn has(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_bools(&self) -> &[bool] {
        &self.bits
    }

    /// Number of present features.
    pub fn count_present(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

impl TryFrom<Vec<i64>> for FeatureVector {
    type Error = ProfileError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        let bits = values
            .into_iter()
            .enumerate()
            .map(|(index, v)| match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(ProfileError::InvalidFeatureValue { index, value: other }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }
}

impl From<FeatureVector> for Vec<u8> {
    fn from(fv: FeatureVector) -> Self {
        fv.bits.into_iter().map(u8::from).collect()
    }
}
