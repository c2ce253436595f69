//! Collaborator seams. The core owns no long-lived data; catalogs,
//! ratings, and profiles live behind these traits.

pub mod catalog;
pub mod profile_store;
pub mod rating_store;

pub use catalog::ICatalog;
pub use profile_store::IProfileStore;
pub use rating_store::IRatingStore;
