use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use palate_core::errors::{CatalogError, PalateResult, ProfileError};
use palate_core::traits::{ICatalog, IProfileStore, IRatingStore};
use palate_core::{
    recommend_span, CatalogItem, FeatureVector, PalateConfig, ProfileVector, RatingRecord,
    RatingScale,
};
use palate_evaluation::{Evaluator, MaeReport};
use palate_solver::{estimate_rating, round_to, ProfileSolution, ProfileSolver};
use tracing::{debug, info, warn};

use crate::recommendation::Recommendation;

/// Recommendation engine over borrowed collaborators.
///
/// Holds no per-user state; every operation reads ratings and profiles
/// through the stores.
pub struct RecommendationEngine<'a> {
    catalog: &'a dyn ICatalog,
    ratings: &'a dyn IRatingStore,
    profiles: &'a dyn IProfileStore,
    solver: ProfileSolver,
    scale: RatingScale,
    config: PalateConfig,
}

impl<'a> RecommendationEngine<'a> {
    /// Fails if `config.scale` is not a valid rating scale.
    pub fn new(
        catalog: &'a dyn ICatalog,
        ratings: &'a dyn IRatingStore,
        profiles: &'a dyn IProfileStore,
        config: PalateConfig,
    ) -> PalateResult<Self> {
        let solver = ProfileSolver::with_config(config.solver.clone());
        Self::with_solver(catalog, ratings, profiles, config, solver)
    }

    /// Like [`RecommendationEngine::new`], but profiles are fitted by
    /// `solver`, which may wrap any [`palate_solver::IMipSolver`] backend.
    /// Evaluation uses the same solver.
    pub fn with_solver(
        catalog: &'a dyn ICatalog,
        ratings: &'a dyn IRatingStore,
        profiles: &'a dyn IProfileStore,
        config: PalateConfig,
        solver: ProfileSolver,
    ) -> PalateResult<Self> {
        let scale = config.scale.scale()?;
        debug!(backend = solver.backend_name(), "recommendation engine ready");
        Ok(Self {
            catalog,
            ratings,
            profiles,
            solver,
            scale,
            config,
        })
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    pub fn config(&self) -> &PalateConfig {
        &self.config
    }

    pub fn solver(&self) -> &ProfileSolver {
        &self.solver
    }

    /// Record (or overwrite) one rating.
    pub fn rate(
        &self,
        user: &str,
        system: &str,
        item_id: &str,
        value: f64,
    ) -> PalateResult<RatingRecord> {
        self.scale.validate(value)?;
        let items = self.catalog.items(system)?;
        if !items.iter().any(|item| item.id == item_id) {
            return Err(CatalogError::UnknownItem {
                system: system.to_string(),
                item: item_id.to_string(),
            }
            .into());
        }
        let record = RatingRecord::new(item_id, value);
        self.ratings.upsert(user, system, record.clone())?;
        debug!(user, system, item_id, value, "rating stored");
        Ok(record)
    }

    /// Fit a profile from the stored ratings and persist it, replacing any
    /// earlier profile for (user, system).
    pub fn refresh_profile(&self, user: &str, system: &str) -> PalateResult<ProfileSolution> {
        let _span = recommend_span!(user, system).entered();
        let rated: Vec<(String, f64)> = self
            .ratings
            .ratings(user, system)?
            .into_iter()
            .map(|r| (r.item_id, r.value))
            .collect();
        let (solution, _) = self.fit(system, &rated)?;
        self.profiles.put(user, system, solution.profile.clone())?;
        info!(
            user,
            system,
            ratings = rated.len(),
            total_error = solution.total_error,
            "profile refreshed"
        );
        Ok(solution)
    }

    /// Fit a profile from ratings supplied by the caller. Nothing is stored.
    pub fn profile_from_ratings(
        &self,
        system: &str,
        ratings: &[(String, f64)],
    ) -> PalateResult<ProfileSolution> {
        self.fit(system, ratings).map(|(solution, _)| solution)
    }

    /// Top items for the stored profile, best first.
    pub fn recommend(&self, user: &str, system: &str) -> PalateResult<Vec<Recommendation>> {
        let _span = recommend_span!(user, system).entered();
        let profile = self
            .profiles
            .get(user, system)?
            .ok_or_else(|| ProfileError::NoProfile {
                user: user.to_string(),
                system: system.to_string(),
            })?;
        self.recommend_for_profile(system, &profile)
    }

    /// Top items for an explicit profile, such as one from
    /// [`RecommendationEngine::profile_from_ratings`].
    pub fn recommend_for_profile(
        &self,
        system: &str,
        profile: &ProfileVector,
    ) -> PalateResult<Vec<Recommendation>> {
        let items = self.catalog.items(system)?;
        let n = profile.len();
        let mut ranked = items
            .into_iter()
            .map(|item| {
                let predicted_rating =
                    estimate_rating(profile, &item.feature_vector, n, self.scale)?;
                Ok(Recommendation {
                    item_id: item.id,
                    name: item.name,
                    image: item.image,
                    predicted_rating,
                })
            })
            .collect::<PalateResult<Vec<_>>>()?;
        ranked.sort_by(|a, b| {
            b.predicted_rating
                .partial_cmp(&a.predicted_rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        ranked.truncate(self.config.profile.recommendation_limit);
        Ok(ranked)
    }

    /// Predicted ratings for `item_ids` from a profile fitted to the user's
    /// current ratings. Unknown ids are left out.
    pub fn estimate_ratings(
        &self,
        user: &str,
        system: &str,
        item_ids: &[String],
    ) -> PalateResult<BTreeMap<String, f64>> {
        let rated: Vec<(String, f64)> = self
            .ratings
            .ratings(user, system)?
            .into_iter()
            .map(|r| (r.item_id, r.value))
            .collect();
        let (solution, items) = self.fit(system, &rated)?;
        let n = solution.profile.len();
        let decimals = self.config.profile.estimate_decimals;

        let mut estimates = BTreeMap::new();
        for item in items.iter().filter(|item| item_ids.contains(&item.id)) {
            let rating = estimate_rating(&solution.profile, &item.feature_vector, n, self.scale)?;
            estimates.insert(item.id.clone(), round_to(rating, decimals));
        }
        if estimates.len() < item_ids.len() {
            debug!(
                requested = item_ids.len(),
                found = estimates.len(),
                "some requested items are not in the catalog"
            );
        }
        Ok(estimates)
    }

    /// Delete every rating and the stored profile for (user, system).
    /// Returns how many ratings were removed.
    pub fn reset(&self, user: &str, system: &str) -> PalateResult<usize> {
        let removed = self.ratings.clear(user, system)?;
        let had_profile = self.profiles.remove(user, system)?;
        info!(user, system, removed, had_profile, "ratings and profile reset");
        Ok(removed)
    }

    /// Cross-validate on catalog items given by id, with rounded averages.
    pub fn evaluate(
        &self,
        system: &str,
        item_ids: &[String],
        ratings: &[f64],
        seed: Option<u64>,
    ) -> PalateResult<MaeReport> {
        let by_id: HashMap<String, FeatureVector> = self
            .catalog
            .feature_vectors(system)?
            .into_iter()
            .collect();
        let vectors = item_ids
            .iter()
            .map(|id| {
                by_id.get(id).cloned().ok_or_else(|| {
                    CatalogError::UnknownItem {
                        system: system.to_string(),
                        item: id.clone(),
                    }
                    .into()
                })
            })
            .collect::<PalateResult<Vec<_>>>()?;

        let mut config = self.config.evaluation.clone();
        if seed.is_some() {
            config.seed = seed;
        }
        let decimals = config.mae_decimals;
        let evaluator = Evaluator::with_solver(self.solver.clone(), config, self.scale);
        Ok(evaluator.evaluate(&vectors, ratings)?.rounded(decimals))
    }

    /// Join ratings to catalog features in catalog order, enforce the
    /// minimum, and solve. Returns the catalog alongside the solution.
    fn fit(
        &self,
        system: &str,
        ratings: &[(String, f64)],
    ) -> PalateResult<(ProfileSolution, Vec<CatalogItem>)> {
        let items = self.catalog.items(system)?;
        let mut by_id: HashMap<&str, f64> = HashMap::with_capacity(ratings.len());
        for (item_id, value) in ratings {
            by_id.insert(item_id.as_str(), self.scale.validate(*value)?);
        }

        let mut vectors = Vec::with_capacity(by_id.len());
        let mut values = Vec::with_capacity(by_id.len());
        for item in &items {
            if let Some(&value) = by_id.get(item.id.as_str()) {
                vectors.push(item.feature_vector.clone());
                values.push(value);
            }
        }
        if vectors.len() < by_id.len() {
            warn!(
                system,
                ignored = by_id.len() - vectors.len(),
                "ratings for items missing from the catalog were ignored"
            );
        }

        let required = self.config.profile.min_ratings;
        if vectors.len() < required {
            return Err(ProfileError::InsufficientRatings {
                required,
                available: vectors.len(),
            }
            .into());
        }

        let solution = self.solver.solve_ratings(&vectors, &values, self.scale)?;
        Ok((solution, items))
    }
}
