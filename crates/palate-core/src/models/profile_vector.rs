use serde::{Deserialize, Serialize};

use crate::errors::ProfileError;
use crate::models::FeatureVector;

/// A user's stance on one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i8")]
pub enum Preference {
    /// Penalize the attribute's presence (`-1`).
    Dislike,
    /// No penalty either way (`0`).
    Indifferent,
    /// Penalize the attribute's absence (`+1`).
    Like,
}

impl Preference {
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Dislike => -1,
            Self::Indifferent => 0,
            Self::Like => 1,
        }
    }

    /// Whether an item with (`present == true`) or without the attribute
    /// contradicts this preference.
    pub fn contradicts(self, present: bool) -> bool {
        matches!(
            (self, present),
            (Self::Dislike, true) | (Self::Like, false)
        )
    }

    pub const ALL: [Preference; 3] = [Self::Dislike, Self::Indifferent, Self::Like];
}

impl TryFrom<i64> for Preference {
    type Error = ProfileError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Dislike),
            0 => Ok(Self::Indifferent),
            1 => Ok(Self::Like),
            other => Err(ProfileError::InvalidPreferenceValue { value: other }),
        }
    }
}

impl From<Preference> for i8 {
    fn from(p: Preference) -> Self {
        p.as_i8()
    }
}

/// Ternary per-feature preference vector learned from ratings.
/// One exists per (user, system) pair; its length equals the system's `n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileVector {
    preferences: Vec<Preference>,
}

impl ProfileVector {
    pub fn new(preferences: Vec<Preference>) -> Self {
        Self { preferences }
    }

    /// Build from `-1`/`0`/`1` values.
    pub fn from_values(values: &[i64]) -> Result<Self, ProfileError> {
        let preferences = values
            .iter()
            .map(|&v| Preference::try_from(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { preferences })
    }

    /// A profile with no stated preferences.
    pub fn indifferent(n: usize) -> Self {
        Self {
            preferences: vec![Preference::Indifferent; n],
        }
    }

    pub fn len(&self) -> usize {
        self.preferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Preference> {
        self.preferences.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Preference> + '_ {
        self.preferences.iter().copied()
    }

    pub fn as_slice(&self) -> &[Preference] {
        &self.preferences
    }

    pub fn to_values(&self) -> Vec<i8> {
        self.preferences.iter().map(|p| p.as_i8()).collect()
    }

    /// Number of features where `features` contradicts this profile.
    /// Callers are responsible for checking the lengths agree.
    pub fn mismatch_count(&self, features: &FeatureVector) -> usize {
        self.preferences
            .iter()
            .zip(features.iter())
            .filter(|(p, present)| p.contradicts(*present))
            .count()
    }
}

impl FromIterator<Preference> for ProfileVector {
    fn from_iter<I: IntoIterator<Item = Preference>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
