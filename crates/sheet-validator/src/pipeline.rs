//! Per-document pipeline
//!
//! [`SheetValidator::check`] is the synchronous core: text and fragments in,
//! one [`ValidationResult`] out. [`DocumentPipeline`] puts an injected
//! [`TextExtractor`] in front of it and bounds the extraction by size, time
//! and page count. A failing document yields a processing-error result and
//! never stops the rest of a batch.

use crate::config::ValidatorConfig;
use crate::engine::ValidationEngine;
use crate::error::ValidatorError;
use crate::extractors::{parse_revisions, FieldExtractor};
use crate::layout::LayoutAnalyzer;
use crate::rules::SheetContext;
use shared_types::{
    ExtractionOutput, RevisionTemplate, TextExtractor, TextFragment, ValidationResult,
};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct SheetValidator {
    config: ValidatorConfig,
    fields: FieldExtractor,
    engine: ValidationEngine,
}

impl SheetValidator {
    /// Compile the field rules for `config`
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Pattern`] if a configured reference value
    /// produces a pattern the regex engine rejects.
    pub fn new(config: ValidatorConfig) -> Result<Self, ValidatorError> {
        let fields = FieldExtractor::new(&config)?;
        let engine = ValidationEngine::new(&config);
        Ok(Self {
            config,
            fields,
            engine,
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn field_extractor(&self) -> &FieldExtractor {
        &self.fields
    }

    /// Extract, analyze and validate one document's text
    pub fn check(
        &self,
        full_text: &str,
        fragments: &[TextFragment],
        template: Option<&RevisionTemplate>,
    ) -> ValidationResult {
        let mut record = self.fields.extract(full_text);
        record.revision_dates = parse_revisions(&record.raw_text);
        debug!(revisions = record.revision_dates.len(), "revisions parsed");

        let layout = LayoutAnalyzer::analyze(fragments, &self.config.layout);

        let (errors, warnings) = self.engine.validate(&SheetContext {
            record: &record,
            revisions: &record.revision_dates,
            layout: &layout,
            template,
        });

        ValidationResult::new(Some(record), errors, warnings)
    }
}

/// One named document of a batch
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

pub struct DocumentPipeline<E: TextExtractor> {
    extractor: E,
    validator: SheetValidator,
}

impl<E: TextExtractor> DocumentPipeline<E> {
    pub fn new(extractor: E, validator: SheetValidator) -> Self {
        Self {
            extractor,
            validator,
        }
    }

    pub fn validator(&self) -> &SheetValidator {
        &self.validator
    }

    async fn extract(&self, bytes: &[u8]) -> Result<ExtractionOutput, ValidatorError> {
        let limits = &self.validator.config().limits;

        if bytes.len() > limits.max_document_bytes {
            return Err(ValidatorError::DocumentTooLarge {
                size: bytes.len(),
                limit: limits.max_document_bytes,
            });
        }

        let output = tokio::time::timeout(
            Duration::from_millis(limits.timeout_ms),
            self.extractor.extract_document_text(bytes),
        )
        .await
        .map_err(|_elapsed| ValidatorError::Timeout(limits.timeout_ms))??;

        debug!(
            extractor = self.extractor.name(),
            pages = output.num_pages,
            max_pages = limits.max_pages,
            "text extracted"
        );
        Ok(output.limit_pages(limits.max_pages))
    }

    /// Validate one document. Extraction failures become a processing-error result.
    pub async fn process_document(
        &self,
        bytes: &[u8],
        template: Option<&RevisionTemplate>,
    ) -> ValidationResult {
        match self.extract(bytes).await {
            Ok(output) => self
                .validator
                .check(&output.full_text, &output.text_items, template),
            Err(e) => {
                warn!(
                    extractor = self.extractor.name(),
                    error = %e,
                    "document could not be processed"
                );
                ValidationResult::processing_error(e)
            }
        }
    }

    /// Validate documents one at a time, in input order; one result per input
    pub async fn process_batch(
        &self,
        documents: &[DocumentInput],
        template: Option<&RevisionTemplate>,
    ) -> Vec<ValidationResult> {
        let mut results = Vec::with_capacity(documents.len());

        for (index, document) in documents.iter().enumerate() {
            let result = self.process_document(&document.bytes, template).await;
            info!(
                document = %document.name,
                index,
                status = ?result.status,
                errors = result.errors.len(),
                warnings = result.warnings.len(),
                "document processed"
            );
            results.push(result);
        }

        results
    }
}
