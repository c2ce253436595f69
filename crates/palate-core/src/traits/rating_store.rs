use crate::errors::PalateResult;
use crate::models::RatingRecord;

/// Per-(user, system) rating storage with last-write-wins upserts.
pub trait IRatingStore: Send + Sync {
    /// All ratings `user` has given in `system`.
    fn ratings(&self, user: &str, system: &str) -> PalateResult<Vec<RatingRecord>>;

    /// Insert or overwrite the rating for `record.item_id`.
    fn upsert(&self, user: &str, system: &str, record: RatingRecord) -> PalateResult<()>;

    /// Remove one rating. Returns whether it existed.
    fn remove(&self, user: &str, system: &str, item_id: &str) -> PalateResult<bool>;

    /// Remove every rating for (user, system). Returns how many were removed.
    fn clear(&self, user: &str, system: &str) -> PalateResult<usize>;
}
