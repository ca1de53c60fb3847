//! Architectural sheet metadata validation
//!
//! Pulls title-block fields and the revision table out of a sheet's text,
//! checks fragment layout in the title block, and validates everything
//! against reference values and an optional revision template.

pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractors;
pub mod layout;
pub mod patterns;
pub mod pipeline;
pub mod rules;

pub use config::{load_template, ValidatorConfig};
pub use engine::ValidationEngine;
pub use error::ValidatorError;
pub use extractors::{parse_revisions, FieldExtractor};
pub use layout::{LayoutAnalyzer, LayoutReport};
pub use pipeline::{DocumentInput, DocumentPipeline, SheetValidator};

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{FindingKind, TextFragment, ValidationStatus};

    const CLEAN_SHEET: &str = "PROYECTO: Casa hermanos ARQUITECTO: Javier Andrés Moya Ortiz \
        PROPIETARIO: Omar Andrés Param Abu-ghosh DIRECCIÓN: Monseñor Adolfo Rodriguez 12772 \
        FECHA: Agosto 2024 LÁMINA: 6-S8 CORTES ARQUITECTÓNICOS ESC 1:50 \
        REV DESCRIPCIÓN FECHA 1 PROYECTO DEFINITIVO 15/01/2024 \
        2 MODIFICACIÓN DE PROYECTO 13/08/2024";

    fn title_block() -> Vec<TextFragment> {
        [
            "PROYECTO: Casa hermanos",
            "ARQUITECTO: Javier Andrés Moya Ortiz",
            "ESC 1:50",
            "FECHA: Agosto 2024",
        ]
        .iter()
        .enumerate()
        .map(|(i, text)| TextFragment::at(*text, 2900.0, 60.0 + i as f64 * 14.0))
        .collect()
    }

    #[test]
    fn test_clean_sheet_is_approved() {
        let validator = SheetValidator::new(ValidatorConfig::default()).unwrap();
        let result = validator.check(CLEAN_SHEET, &title_block(), None);

        assert_eq!(result.status, ValidationStatus::Approved, "{:#?}", result);
        let record = result.extracted_data.unwrap();
        assert_eq!(record.project_name, "Casa hermanos");
        assert_eq!(record.sheet, "6-S8");
        assert_eq!(record.revision_dates.len(), 2);
    }

    #[test]
    fn test_same_day_modification_is_rejected() {
        let validator = SheetValidator::new(ValidatorConfig::default()).unwrap();
        let text = CLEAN_SHEET.replace("13/08/2024", "15/01/2024");
        let result = validator.check(&text, &title_block(), None);

        assert_eq!(result.status, ValidationStatus::Rejected);
        assert!(result.has_finding(FindingKind::DuplicateDates));
        assert!(result.has_finding(FindingKind::SameDateLogic));
    }

    #[test]
    fn test_empty_document_warns() {
        let validator = SheetValidator::new(ValidatorConfig::default()).unwrap();
        let result = validator.check("", &[], None);

        assert_eq!(result.status, ValidationStatus::Warning);
        assert!(result.has_finding(FindingKind::ArchitectNameMissing));
        assert!(result.has_finding(FindingKind::ProjectNameMissing));
        assert!(result.has_finding(FindingKind::LayoutIssue));
        assert!(result.has_finding(FindingKind::LowContent));
        assert!(result.errors.is_empty());
    }
}
