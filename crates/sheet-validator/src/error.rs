//! Error types for the validator

use shared_types::ExtractError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Invalid {field} pattern: {source}")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Extraction timeout after {0}ms")]
    Timeout(u64),

    #[error("Document too large: {size} bytes (limit {limit})")]
    DocumentTooLarge { size: usize, limit: usize },
}
