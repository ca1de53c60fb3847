use super::{SheetContext, ValidationRule};
use crate::patterns::clean_text;
use shared_types::{Finding, FindingKind};

/// Shortest project name taken as real
const MIN_PROJECT_NAME_CHARS: usize = 3;

/// Project name presence, plus agreement with the configured project when there is one
pub struct ProjectNameRule {
    reference: Option<String>,
}

impl ProjectNameRule {
    pub fn new(reference: Option<String>) -> Self {
        Self {
            reference: reference
                .map(|r| clean_text(&r))
                .filter(|r| !r.is_empty()),
        }
    }
}

impl ValidationRule for ProjectNameRule {
    fn name(&self) -> &str {
        "project_name"
    }

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding> {
        let found = clean_text(&sheet.record.project_name);

        if found.chars().count() < MIN_PROJECT_NAME_CHARS {
            return vec![Finding::warning(
                FindingKind::ProjectNameMissing,
                "Project name not found or too short",
                format!("Found: '{}'", found),
            )];
        }

        match &self.reference {
            Some(expected) if !found.to_lowercase().contains(&expected.to_lowercase()) => {
                vec![Finding::error(
                    FindingKind::ProjectNameMismatch,
                    "Project name does not match the project",
                    format!("Found: '{}', expected: '{}'", found, expected),
                )]
            }
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::run;
    use shared_types::{ExtractedRecord, Severity};

    fn check(reference: Option<&str>, project_name: &str) -> Vec<Finding> {
        let record = ExtractedRecord {
            project_name: project_name.to_string(),
            ..Default::default()
        };
        run(
            &ProjectNameRule::new(reference.map(str::to_string)),
            &record,
            &[],
        )
    }

    #[test]
    fn test_missing_or_short_name_warns() {
        for name in ["", "  ", "AB"] {
            let findings = check(None, name);
            assert_eq!(findings.len(), 1, "name {:?}", name);
            assert_eq!(findings[0].kind, FindingKind::ProjectNameMissing);
            assert_eq!(findings[0].severity, Severity::Warning);
        }
    }

    #[test]
    fn test_any_name_passes_without_reference() {
        assert!(check(None, "Casa hermanos").is_empty());
        assert!(check(None, "Edificio Central").is_empty());
    }

    #[test]
    fn test_reference_match_ignores_case() {
        assert!(check(Some("Casa hermanos"), "AMPLIACIÓN CASA HERMANOS").is_empty());
    }

    #[test]
    fn test_reference_mismatch_is_error() {
        let findings = check(Some("Casa hermanos"), "Casa Pérez");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::ProjectNameMismatch);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].details.contains("expected: 'Casa hermanos'"));
    }

    #[test]
    fn test_blank_reference_is_ignored() {
        assert!(check(Some("  "), "Casa Pérez").is_empty());
    }
}
