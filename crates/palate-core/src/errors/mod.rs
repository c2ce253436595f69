//! Error handling for Palate.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod catalog_error;
pub mod config_error;
pub mod error_code;
pub mod evaluation_error;
pub mod palate_error;
pub mod profile_error;
pub mod solver_error;

pub use catalog_error::CatalogError;
pub use config_error::ConfigError;
pub use error_code::PalateErrorCode;
pub use evaluation_error::EvaluationError;
pub use palate_error::{PalateError, PalateResult};
pub use profile_error::ProfileError;
pub use solver_error::SolverError;
