//! The ternary-profile mixed-integer program.
//!
//! Variables, in declaration order:
//! `x_j ∈ {−1,0,1}`, `like_j`, `dislike_j ∈ {0,1}` interleaved per feature,
//! then `z_i ≥ 0` per training item.
//!
//! Rows:
//! - `x + 2·dislike ≤ 1`, `x + dislike ≥ 0`, `x − like ≤ 0`, `x − 2·like ≥ −1`
//!   tie the indicators to `x` (`like ⇔ x = 1`, `dislike ⇔ x = −1`).
//! - `mismatch_i + z_i ≥ δ_i` and `mismatch_i − z_i ≤ δ_i`, where
//!   `mismatch_i = Σ_j (like_j if bit_ij = 0 else dislike_j)`.
//!
//! Objective: `min Σ z_i`.

use palate_core::errors::SolverError;
use palate_core::{FeatureVector, Preference, ProfileVector};

use crate::mip::{LinearExpr, MipModel, MipSolution, VarId};

/// Integrality slack accepted when reading `x_j` back from a backend.
const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Profile MIP plus the handles needed to seed and decode it.
#[derive(Debug, Clone)]
pub struct ProfileFormulation {
    model: MipModel,
    x: Vec<VarId>,
    like: Vec<VarId>,
    dislike: Vec<VarId>,
    z: Vec<VarId>,
    vectors: Vec<FeatureVector>,
    deltas: Vec<f64>,
}

impl ProfileFormulation {
    /// Build the model. Inputs must already be validated: `vectors` and
    /// `deltas` have equal, non-zero length and every vector has `n` entries.
    pub fn build(vectors: &[FeatureVector], deltas: &[f64]) -> Self {
        let n = vectors.first().map_or(0, FeatureVector::len);
        let mut model = MipModel::new(format!("profile_m{}_n{}", vectors.len(), n));

        let mut x = Vec::with_capacity(n);
        let mut like = Vec::with_capacity(n);
        let mut dislike = Vec::with_capacity(n);
        for j in 0..n {
            x.push(model.add_integer(format!("x_{j}"), -1, 1));
            like.push(model.add_binary(format!("like_{j}")));
            dislike.push(model.add_binary(format!("dislike_{j}")));
        }
        let z: Vec<VarId> = (0..vectors.len())
            .map(|i| model.add_continuous(format!("z_{i}"), 0.0, f64::INFINITY))
            .collect();

        for j in 0..n {
            model.less_eq(
                format!("dislike_hi_{j}"),
                LinearExpr::new().term(x[j], 1.0).term(dislike[j], 2.0),
                1.0,
            );
            model.greater_eq(
                format!("dislike_lo_{j}"),
                LinearExpr::new().term(x[j], 1.0).term(dislike[j], 1.0),
                0.0,
            );
            model.less_eq(
                format!("like_lo_{j}"),
                LinearExpr::new().term(x[j], 1.0).term(like[j], -1.0),
                0.0,
            );
            model.greater_eq(
                format!("like_hi_{j}"),
                LinearExpr::new().term(x[j], 1.0).term(like[j], -2.0),
                -1.0,
            );
        }

        for (i, (features, &delta)) in vectors.iter().zip(deltas).enumerate() {
            let mismatch = LinearExpr::sum(
                features
                    .iter()
                    .enumerate()
                    .map(|(j, present)| if present { dislike[j] } else { like[j] }),
            );
            model.greater_eq(format!("fit_lo_{i}"), mismatch.clone().term(z[i], 1.0), delta);
            model.less_eq(format!("fit_hi_{i}"), mismatch.term(z[i], -1.0), delta);
        }

        model.minimize(LinearExpr::sum(z.iter().copied()));

        Self {
            model,
            x,
            like,
            dislike,
            z,
            vectors: vectors.to_vec(),
            deltas: deltas.to_vec(),
        }
    }

    pub fn model(&self) -> &MipModel {
        &self.model
    }

    pub fn features(&self) -> usize {
        self.x.len()
    }

    pub fn items(&self) -> usize {
        self.z.len()
    }

    /// The full variable assignment that represents `profile`, with each
    /// slack at its tightest value.
    pub fn assignment_for(&self, profile: &ProfileVector) -> Vec<f64> {
        let mut values = vec![0.0; self.model.variables().len()];
        for (j, preference) in profile.iter().enumerate().take(self.x.len()) {
            values[self.x[j].index()] = f64::from(preference.as_i8());
            values[self.like[j].index()] = f64::from(u8::from(preference == Preference::Like));
            values[self.dislike[j].index()] =
                f64::from(u8::from(preference == Preference::Dislike));
        }
        for (i, (features, &delta)) in self.vectors.iter().zip(&self.deltas).enumerate() {
            let mismatch = profile.mismatch_count(features) as f64;
            values[self.z[i].index()] = (mismatch - delta).abs();
        }
        values
    }

    /// Offer `profile` to the backend as the starting incumbent.
    pub fn set_warm_start(&mut self, profile: &ProfileVector) {
        let values = self.assignment_for(profile);
        self.model.set_initial_solution(values);
    }

    /// Read the profile back out of a backend solution.
    pub fn extract(&self, solution: &MipSolution) -> Result<ProfileVector, SolverError> {
        let invalid = |reason: String| SolverError::InvalidSolution {
            model: self.model.name().to_string(),
            reason,
        };
        if solution.values.len() != self.model.variables().len() {
            return Err(invalid(format!(
                "{} values for {} variables",
                solution.values.len(),
                self.model.variables().len()
            )));
        }
        self.x
            .iter()
            .enumerate()
            .map(|(j, &var)| {
                let value = solution.value(var);
                let rounded = value.round();
                if (value - rounded).abs() > INTEGRALITY_TOLERANCE {
                    return Err(invalid(format!("x_{j} = {value} is not integral")));
                }
                Preference::try_from(rounded as i64)
                    .map_err(|_| invalid(format!("x_{j} = {value} is not ternary")))
            })
            .collect()
    }
}
