// Revision template conformance: every required stage must appear in the revision table
use super::{SheetContext, ValidationRule};
use crate::patterns::fold_key;
use shared_types::{Finding, FindingKind};

/// Label words shorter than this ("DE", "LA") are not significant
const MIN_KEYWORD_CHARS: usize = 4;

pub struct TemplateRule;

/// Case- and accent-insensitive: the whole label as a substring, or every significant word of it
pub fn description_matches(description: &str, label: &str) -> bool {
    let description = fold_key(description);
    let label = fold_key(label);
    if label.is_empty() {
        return false;
    }
    if description.contains(&label) {
        return true;
    }

    let keywords: Vec<&str> = label
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS)
        .collect();
    !keywords.is_empty() && keywords.iter().all(|word| description.contains(word))
}

impl ValidationRule for TemplateRule {
    fn name(&self) -> &str {
        "template"
    }

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding> {
        let Some(template) = sheet.template else {
            return vec![];
        };

        template
            .required_entries()
            .filter(|entry| {
                !sheet
                    .revisions
                    .iter()
                    .any(|revision| description_matches(&revision.description, &entry.description))
            })
            .map(|entry| {
                Finding::error(
                    FindingKind::RequiredRevisionMissing,
                    format!("Required revision missing: {}", entry.description),
                    format!(
                        "Template '{}' expects revision {} '{}'; found {} revision(s)",
                        template.name,
                        entry.number,
                        entry.description,
                        sheet.revisions.len()
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::{aligned_layout, revision};
    use shared_types::{ExtractedRecord, RevisionEntry, RevisionTemplate, TemplateEntry};

    fn template() -> RevisionTemplate {
        RevisionTemplate {
            name: "Vivienda".to_string(),
            entries: vec![
                TemplateEntry {
                    number: "1".to_string(),
                    description: "PROYECTO DEFINITIVO".to_string(),
                    required: true,
                },
                TemplateEntry {
                    number: "2".to_string(),
                    description: "MODIFICACIÓN DE PROYECTO".to_string(),
                    required: false,
                },
            ],
        }
    }

    fn check(template: Option<&RevisionTemplate>, revisions: &[RevisionEntry]) -> Vec<Finding> {
        let record = ExtractedRecord::default();
        let layout = aligned_layout();
        TemplateRule.check(&SheetContext {
            record: &record,
            revisions,
            layout: &layout,
            template,
        })
    }

    #[test]
    fn test_missing_required_entry() {
        let template = template();
        let revisions = [revision("1", "ANTEPROYECTO", "02/01/2024")];
        let findings = check(Some(&template), &revisions);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::RequiredRevisionMissing);
        assert!(findings[0].message.contains("PROYECTO DEFINITIVO"));
    }

    #[test]
    fn test_required_entry_in_any_casing() {
        let template = template();
        for description in ["PROYECTO DEFINITIVO", "proyecto definitivo", "Proyecto Definitivo"] {
            let revisions = [revision("1", description, "15/01/2024")];
            assert!(check(Some(&template), &revisions).is_empty(), "{}", description);
        }
    }

    #[test]
    fn test_optional_entries_not_enforced() {
        let template = template();
        let revisions = [revision("1", "PROYECTO DEFINITIVO", "15/01/2024")];
        assert!(check(Some(&template), &revisions).is_empty());
    }

    #[test]
    fn test_no_template_no_findings() {
        assert!(check(None, &[]).is_empty());
    }

    #[test]
    fn test_keyword_match() {
        assert!(description_matches("PROYECTO DE ARQUITECTURA DEFINITIVO", "PROYECTO DEFINITIVO"));
        assert!(description_matches("Modificacion del proyecto", "MODIFICACIÓN DE PROYECTO"));
        assert!(!description_matches("ANTEPROYECTO", "PROYECTO DEFINITIVO"));
        assert!(!description_matches("PROYECTO", ""));
    }
}
