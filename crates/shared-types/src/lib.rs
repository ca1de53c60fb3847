pub mod extractor;
pub mod types;

pub use extractor::{ExtractError, TextExtractor};
pub use types::{
    ExtractedRecord, ExtractionOutput, Finding, FindingKind, RevisionEntry, RevisionTemplate,
    Severity, TemplateEntry, TextFragment, ValidationResult, ValidationStatus,
};
