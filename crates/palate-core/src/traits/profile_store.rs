use crate::errors::PalateResult;
use crate::models::ProfileVector;

/// Persistence for solved profiles, keyed by (user, system).
/// `put` overwrites; concurrent writers are not serialized, last write wins.
pub trait IProfileStore: Send + Sync {
    fn get(&self, user: &str, system: &str) -> PalateResult<Option<ProfileVector>>;
    fn put(&self, user: &str, system: &str, profile: ProfileVector) -> PalateResult<()>;
    /// Returns whether a profile existed.
    fn remove(&self, user: &str, system: &str) -> PalateResult<bool>;
}
