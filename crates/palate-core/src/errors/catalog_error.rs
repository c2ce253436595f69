//! Catalog normalisation and lookup errors.

use super::error_code::{self, PalateErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("document {index} is missing mapped field '{field}'")]
    MissingField { index: usize, field: String },

    #[error("document {index} has an invalid '{field}' field: {reason}")]
    InvalidField {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("unknown system '{system}'")]
    UnknownSystem { system: String },

    #[error("item '{item}' not found in system '{system}'")]
    UnknownItem { system: String, item: String },
}

impl PalateErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        error_code::CATALOG_ERROR
    }
}
