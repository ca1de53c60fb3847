//! Document text extraction capability
//!
//! The validator never decodes documents itself. Whoever drives it injects
//! something implementing [`TextExtractor`]; tests use synthetic fixtures.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::ExtractionOutput;

/// Errors an extractor backend can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Password-protected document")]
    PasswordProtected,

    #[error("Text decoding failed: {0}")]
    Decoding(String),

    #[error("Extractor unavailable: {0}")]
    Unavailable(String),
}

/// Turns raw document bytes into page text plus positioned fragments
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Backend identifier, used in logs
    fn name(&self) -> &'static str;

    async fn extract_document_text(&self, bytes: &[u8]) -> Result<ExtractionOutput, ExtractError>;
}
