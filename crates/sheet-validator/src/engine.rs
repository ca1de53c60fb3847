use crate::config::ValidatorConfig;
use crate::rules::{all_rules, SheetContext, ValidationRule};
use shared_types::{Finding, Severity};
use tracing::debug;

/// Runs every rule and splits the findings by severity
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self::with_rules(all_rules(config))
    }

    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Returns `(errors, warnings)`, each in rule order
    pub fn validate(&self, sheet: &SheetContext<'_>) -> (Vec<Finding>, Vec<Finding>) {
        let findings: Vec<Finding> = self
            .rules
            .iter()
            .flat_map(|rule| {
                let found = rule.check(sheet);
                if !found.is_empty() {
                    debug!(rule = rule.name(), count = found.len(), "rule produced findings");
                }
                found
            })
            .collect();

        findings
            .into_iter()
            .partition(|finding| finding.severity == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::{aligned_layout, revision};
    use shared_types::{ExtractedRecord, FindingKind};

    #[test]
    fn test_findings_split_by_severity() {
        let engine = ValidationEngine::new(&ValidatorConfig::default());
        let record = ExtractedRecord {
            architect: "Javier Andrés Moya Ortizs".to_string(),
            raw_text: "too short".to_string(),
            ..Default::default()
        };
        let revisions = [
            revision("1", "PROYECTO DEFINITIVO", "13/08/2024"),
            revision("2", "MODIFICACIÓN DE PROYECTO", "13/08/2024"),
        ];
        let layout = aligned_layout();

        let (errors, warnings) = engine.validate(&SheetContext {
            record: &record,
            revisions: &revisions,
            layout: &layout,
            template: None,
        });

        let error_kinds: Vec<_> = errors.iter().map(|f| f.kind).collect();
        let warning_kinds: Vec<_> = warnings.iter().map(|f| f.kind).collect();
        assert_eq!(
            error_kinds,
            vec![
                FindingKind::ArchitectNameTypo,
                FindingKind::DuplicateDates,
                FindingKind::SameDateLogic,
            ]
        );
        assert_eq!(
            warning_kinds,
            vec![FindingKind::ProjectNameMissing, FindingKind::LowContent]
        );
    }

    #[test]
    fn test_rule_set() {
        let engine = ValidationEngine::new(&ValidatorConfig::default());
        assert_eq!(
            engine.rule_names(),
            vec![
                "architect_name",
                "project_name",
                "duplicate_dates",
                "invalid_date",
                "stage_sequence",
                "template",
                "layout",
                "low_content",
                "scale",
            ]
        );
    }
}
