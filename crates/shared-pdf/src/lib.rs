//! PDF text extraction for sheet validation
//!
//! Implements the [`shared_types::TextExtractor`] capability on top of lopdf,
//! with pdf-extract as a plain-text fallback.

pub mod content;
pub mod extractor;

pub use content::{decode_text_operand, page_fragments};
pub use extractor::LopdfTextExtractor;
