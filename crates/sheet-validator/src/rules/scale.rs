// Drawing scale checks
use super::{SheetContext, ValidationRule};
use crate::config::DetailScaleRule;
use crate::extractors::fields::scale_ratio;
use crate::patterns::fold_key;
use shared_types::{Finding, FindingKind};

/// Flags `1:N` ratios outside the acceptable set and detail sheets off their
/// expected scale. Detail rules may also carry a formatting reminder.
pub struct ScaleRule {
    acceptable: Vec<u32>,
    details: Vec<DetailScaleRule>,
}

impl ScaleRule {
    pub fn new(acceptable: Vec<u32>, details: Vec<DetailScaleRule>) -> Self {
        Self {
            acceptable,
            details,
        }
    }

    fn acceptable_list(&self) -> String {
        self.acceptable
            .iter()
            .map(|n| format!("1:{}", n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ValidationRule for ScaleRule {
    fn name(&self) -> &str {
        "scale"
    }

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let scale = sheet.record.scale.as_str();
        let ratio = scale_ratio(scale);

        if let Some(ratio) = ratio {
            if !self.acceptable.contains(&ratio) {
                findings.push(Finding::warning(
                    FindingKind::ScaleWarning,
                    format!("Non-standard scale 1:{}", ratio),
                    format!("Found: '{}', acceptable: {}", scale, self.acceptable_list()),
                ));
            }
        }

        let document_type = fold_key(&sheet.record.document_type);
        if document_type.is_empty() {
            return findings;
        }

        for detail in &self.details {
            if !document_type.contains(&fold_key(&detail.keyword)) {
                continue;
            }
            if let Some(note) = &detail.formatting_note {
                findings.push(Finding::warning(
                    FindingKind::DetailFormatting,
                    format!("Check formatting of {}", sheet.record.document_type),
                    note.clone(),
                ));
            }
            if ratio.is_none() || ratio != scale_ratio(&detail.scale) {
                findings.push(Finding::warning(
                    FindingKind::ScaleWarning,
                    format!(
                        "Recommended scale for {} is {}",
                        sheet.record.document_type, detail.scale
                    ),
                    format!(
                        "Found: '{}', {} sheets are usually drawn at {}",
                        scale, detail.keyword, detail.scale
                    ),
                ));
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use crate::rules::fixtures::run;
    use shared_types::ExtractedRecord;

    fn check(document_type: &str, scale: &str) -> Vec<Finding> {
        let config = ValidatorConfig::default();
        let rule = ScaleRule::new(config.acceptable_scales, config.detail_scales);
        let record = ExtractedRecord {
            document_type: document_type.to_string(),
            scale: scale.to_string(),
            ..Default::default()
        };
        run(&rule, &record, &[])
    }

    #[test]
    fn test_standard_scale_passes() {
        assert!(check("Cortes Arquitectónicos", "1:50").is_empty());
        assert!(check("", "Indicado").is_empty());
        assert!(check("", "").is_empty());
    }

    #[test]
    fn test_unusual_ratio_warns() {
        let findings = check("Cortes Arquitectónicos", "1:33");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::ScaleWarning);
        assert!(findings[0].details.contains("1:25"));
    }

    fn kinds(findings: &[Finding]) -> Vec<FindingKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_bathroom_detail_expects_1_25() {
        assert_eq!(
            kinds(&check("Detalle Baños", "1:25")),
            vec![FindingKind::DetailFormatting]
        );

        let findings = check("Detalle Baños", "1:50");
        assert_eq!(
            kinds(&findings),
            vec![FindingKind::DetailFormatting, FindingKind::ScaleWarning]
        );
        assert!(findings[1].message.contains("1:25"));

        assert_eq!(check("Detalle Baños", "Indicado").len(), 2);
    }

    #[test]
    fn test_bathroom_detail_formatting_reminder() {
        let findings = check("Detalle Baños", "1:25");
        assert_eq!(findings[0].severity, shared_types::Severity::Warning);
        assert_eq!(findings[0].message, "Check formatting of Detalle Baños");
        assert!(findings[0].details.contains("precisely aligned"));
    }

    #[test]
    fn test_closet_detail_expects_1_25() {
        assert_eq!(check("Detalle de Closets", "1:20").len(), 1);
        assert!(check("Detalle de Closets", "1:25").is_empty());
    }
}
