use serde::{Deserialize, Serialize};

/// One positioned run of text as reported by a document text extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_name: String,
    pub font_size: f64,
    /// 1-based page number the fragment belongs to
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

impl TextFragment {
    /// Fragment at a position with no font metadata (fixtures and fallbacks)
    pub fn at(text: impl Into<String>, x: f64, y: f64) -> Self {
        let text = text.into();
        Self {
            width: text.chars().count() as f64 * 5.0,
            height: 8.0,
            text,
            x,
            y,
            font_name: String::new(),
            font_size: 8.0,
            page: 1,
        }
    }
}

/// What an extractor yields for one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub full_text: String,
    pub page_texts: Vec<String>, // One entry per processed page
    pub text_items: Vec<TextFragment>,
    pub num_pages: u32,
    pub processed_pages: u32,
}

impl ExtractionOutput {
    /// Build an output from per-page fragments, joining each page's texts with spaces
    pub fn from_pages(pages: Vec<Vec<TextFragment>>, num_pages: u32) -> Self {
        let page_texts: Vec<String> = pages
            .iter()
            .map(|items| {
                items
                    .iter()
                    .map(|item| item.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        Self {
            full_text: page_texts.join(" "),
            processed_pages: page_texts.len() as u32,
            page_texts,
            text_items: pages.into_iter().flatten().collect(),
            num_pages,
        }
    }

    /// Drop everything past the first `max_pages` pages and rebuild `full_text`
    pub fn limit_pages(mut self, max_pages: u32) -> Self {
        if self.page_texts.len() > max_pages as usize {
            self.page_texts.truncate(max_pages as usize);
            self.full_text = self.page_texts.join(" ");
        }
        self.text_items.retain(|item| item.page <= max_pages);
        self.processed_pages = self.processed_pages.min(max_pages);
        self
    }
}

/// One row of a sheet's revision table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionEntry {
    pub number: String, // Kept verbatim, e.g. "1" or "1.1"
    pub description: String,
    pub date: String, // DD/MM/YYYY as captured
    pub full_match: String,
    pub pattern_used: usize,
    pub position: usize, // Byte offset in the cleaned text
}

impl RevisionEntry {
    pub fn new(number: &str, description: &str, date: &str) -> Self {
        Self {
            number: number.to_string(),
            description: description.to_string(),
            date: date.to_string(),
            full_match: format!("{} {} {}", number, description, date),
            pattern_used: 0,
            position: 0,
        }
    }
}

/// Title-block fields pulled out of a document; empty strings mean "not found"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub project_name: String,
    pub architect: String,
    pub owner: String,
    pub address: String,
    pub title_date: String,
    pub sheet: String,
    pub document_type: String,
    pub scale: String,
    pub revision_dates: Vec<RevisionEntry>,
    pub raw_text: String,
}

/// One expected revision stage in a project template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub number: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

/// Project-specific ordered list of revision stages a sheet must carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionTemplate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub entries: Vec<TemplateEntry>,
}

impl RevisionTemplate {
    pub fn required_entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.iter().filter(|entry| entry.required)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Machine-readable finding codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    ProcessingError,
    ArchitectNameTypo,
    ArchitectNameAccent,
    ArchitectNameIncomplete,
    ArchitectNameMismatch,
    ArchitectNameMissing,
    ProjectNameMissing,
    ProjectNameMismatch,
    DuplicateDates,
    SameDateLogic,
    SequenceViolation,
    PreliminarySequenceViolation,
    InvalidDate,
    RequiredRevisionMissing,
    LayoutIssue,
    LowContent,
    ScaleWarning,
    DetailFormatting,
}

impl FindingKind {
    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::ProcessingError => "PROCESSING_ERROR",
            FindingKind::ArchitectNameTypo => "ARCHITECT_NAME_TYPO",
            FindingKind::ArchitectNameAccent => "ARCHITECT_NAME_ACCENT",
            FindingKind::ArchitectNameIncomplete => "ARCHITECT_NAME_INCOMPLETE",
            FindingKind::ArchitectNameMismatch => "ARCHITECT_NAME_MISMATCH",
            FindingKind::ArchitectNameMissing => "ARCHITECT_NAME_MISSING",
            FindingKind::ProjectNameMissing => "PROJECT_NAME_MISSING",
            FindingKind::ProjectNameMismatch => "PROJECT_NAME_MISMATCH",
            FindingKind::DuplicateDates => "DUPLICATE_DATES",
            FindingKind::SameDateLogic => "SAME_DATE_LOGIC",
            FindingKind::SequenceViolation => "SEQUENCE_VIOLATION",
            FindingKind::PreliminarySequenceViolation => "PRELIMINARY_SEQUENCE_VIOLATION",
            FindingKind::InvalidDate => "INVALID_DATE",
            FindingKind::RequiredRevisionMissing => "REQUIRED_REVISION_MISSING",
            FindingKind::LayoutIssue => "LAYOUT_ISSUE",
            FindingKind::LowContent => "LOW_CONTENT",
            FindingKind::ScaleWarning => "SCALE_WARNING",
            FindingKind::DetailFormatting => "DETAIL_FORMATTING",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub message: String,
    pub details: String,
    pub severity: Severity,
}

impl Finding {
    pub fn error(
        kind: FindingKind,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: details.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(
        kind: FindingKind,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: details.into(),
            severity: Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Approved,
    Warning,
    Rejected,
}

impl ValidationStatus {
    pub fn from_findings(errors: &[Finding], warnings: &[Finding]) -> Self {
        if !errors.is_empty() {
            ValidationStatus::Rejected
        } else if !warnings.is_empty() {
            ValidationStatus::Warning
        } else {
            ValidationStatus::Approved
        }
    }
}

/// Outcome for one document. `status` is always derived from the two lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub extracted_data: Option<ExtractedRecord>,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub status: ValidationStatus,
}

impl ValidationResult {
    pub fn new(
        extracted_data: Option<ExtractedRecord>,
        errors: Vec<Finding>,
        warnings: Vec<Finding>,
    ) -> Self {
        let status = ValidationStatus::from_findings(&errors, &warnings);
        Self {
            extracted_data,
            errors,
            warnings,
            status,
        }
    }

    /// Result for a document whose text could not be obtained at all
    pub fn processing_error(cause: impl std::fmt::Display) -> Self {
        Self::new(
            None,
            vec![Finding::error(
                FindingKind::ProcessingError,
                "Document could not be processed",
                cause.to_string(),
            )],
            Vec::new(),
        )
    }

    pub fn has_finding(&self, kind: FindingKind) -> bool {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .any(|f| f.kind == kind)
    }
}
