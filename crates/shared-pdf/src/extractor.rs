//! lopdf-backed [`TextExtractor`]
//!
//! Positioned fragments come from walking each page's content stream. CAD
//! exports often draw text with Identity-H fonts that lopdf cannot map to
//! characters without ToUnicode; when a whole document yields no positioned
//! text, pdf-extract's plain text is used instead, with no fragments.

use crate::content::page_fragments;
use async_trait::async_trait;
use lopdf::Document;
use shared_types::{ExtractError, ExtractionOutput, TextExtractor, TextFragment};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct LopdfTextExtractor {
    max_pages: Option<u32>,
}

impl LopdfTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip decoding pages past `max_pages`; the page count still reports the whole document
    pub fn with_max_pages(max_pages: u32) -> Self {
        Self {
            max_pages: Some(max_pages),
        }
    }

    /// Blocking extraction; [`TextExtractor::extract_document_text`] runs this on the blocking pool
    pub fn extract_sync(&self, bytes: &[u8]) -> Result<ExtractionOutput, ExtractError> {
        if !is_pdf(bytes) {
            return Err(ExtractError::InvalidDocument(
                "missing %PDF header".to_string(),
            ));
        }

        let doc = Document::load_mem(bytes)
            .map_err(|e| ExtractError::InvalidDocument(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(ExtractError::PasswordProtected);
        }

        let page_ids = doc.get_pages();
        let num_pages = page_ids.len() as u32;
        let limit = self.max_pages.map_or(usize::MAX, |n| n as usize);

        let pages: Vec<Vec<TextFragment>> = page_ids
            .iter()
            .take(limit)
            .map(|(&number, &id)| page_fragments(&doc, id, number))
            .collect();

        if num_pages > 0 && pages.iter().all(Vec::is_empty) {
            debug!(num_pages, "no positioned text, falling back to plain text");
            return self.plain_text(bytes, num_pages);
        }

        debug!(
            num_pages,
            fragments = pages.iter().map(Vec::len).sum::<usize>(),
            "content streams decoded"
        );
        Ok(ExtractionOutput::from_pages(pages, num_pages))
    }

    fn plain_text(&self, bytes: &[u8], num_pages: u32) -> Result<ExtractionOutput, ExtractError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Decoding(e.to_string()))?;

        let limit = self.max_pages.map_or(usize::MAX, |n| n as usize);
        let page_texts: Vec<String> = text
            .split('\x0C')
            .take(limit)
            .map(|page| page.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();

        Ok(ExtractionOutput {
            full_text: page_texts.join(" "),
            processed_pages: page_texts.len() as u32,
            page_texts,
            text_items: Vec::new(),
            num_pages,
        })
    }
}

fn is_pdf(bytes: &[u8]) -> bool {
    bytes.len() > 4 && &bytes[0..4] == b"%PDF"
}

#[async_trait]
impl TextExtractor for LopdfTextExtractor {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    async fn extract_document_text(&self, bytes: &[u8]) -> Result<ExtractionOutput, ExtractError> {
        let extractor = self.clone();
        let data = bytes.to_vec();
        tokio::task::spawn_blocking(move || extractor.extract_sync(&data))
            .await
            .map_err(|e| ExtractError::Unavailable(format!("extraction task failed: {}", e)))?
    }
}
