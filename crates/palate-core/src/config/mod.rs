//! Configuration system for Palate.
//! TOML-based, resolved as: environment > config file > compiled defaults.

pub mod evaluation_config;
pub mod palate_config;
pub mod profile_config;
pub mod scale_config;
pub mod solver_config;
pub mod system_config;

pub use evaluation_config::EvaluationConfig;
pub use palate_config::PalateConfig;
pub use profile_config::ProfileConfig;
pub use scale_config::ScaleConfig;
pub use solver_config::SolverConfig;
pub use system_config::{FieldMapping, SystemConfig};
