//! Batch report formatting (plain text and JSON)

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_types::{Finding, RevisionTemplate, Severity, ValidationResult, ValidationStatus};
use std::fmt::Write;

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub template: Option<String>,
    pub summary: Summary,
    pub documents: Vec<DocumentReport>,
}

#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub file: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub approved: usize,
    pub warning: usize,
    pub rejected: usize,
}

impl Summary {
    fn from_results<'a>(results: impl Iterator<Item = &'a ValidationResult>) -> Self {
        let mut summary = Summary::default();
        for result in results {
            summary.total += 1;
            match result.status {
                ValidationStatus::Approved => summary.approved += 1,
                ValidationStatus::Warning => summary.warning += 1,
                ValidationStatus::Rejected => summary.rejected += 1,
            }
        }
        summary
    }
}

impl BatchReport {
    /// Pair file names with results; both are in input order
    pub fn new(
        files: Vec<String>,
        results: Vec<ValidationResult>,
        template: Option<&RevisionTemplate>,
    ) -> Self {
        let documents: Vec<DocumentReport> = files
            .into_iter()
            .zip(results)
            .map(|(file, result)| DocumentReport { file, result })
            .collect();

        Self {
            generated_at: Utc::now(),
            template: template.map(|t| t.name.clone()),
            summary: Summary::from_results(documents.iter().map(|d| &d.result)),
            documents,
        }
    }

    pub fn has_rejections(&self) -> bool {
        self.summary.rejected > 0
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for document in &self.documents {
            let result = &document.result;
            let _ = writeln!(
                out,
                "{}: {} ({} error(s), {} warning(s))",
                document.file,
                status_label(result.status),
                result.errors.len(),
                result.warnings.len()
            );
            for finding in result.errors.iter().chain(&result.warnings) {
                let _ = writeln!(out, "  {}", finding_line(finding));
            }
        }

        let _ = writeln!(
            out,
            "{} document(s): {} approved, {} with warnings, {} rejected",
            self.summary.total, self.summary.approved, self.summary.warning, self.summary.rejected
        );
        out
    }
}

fn status_label(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Approved => "APPROVED",
        ValidationStatus::Warning => "WARNING",
        ValidationStatus::Rejected => "REJECTED",
    }
}

fn finding_line(finding: &Finding) -> String {
    let severity = match finding.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    if finding.details.is_empty() {
        format!("{:<7} {} {}", severity, finding.kind, finding.message)
    } else {
        format!(
            "{:<7} {} {} [{}]",
            severity, finding.kind, finding.message, finding.details
        )
    }
}
