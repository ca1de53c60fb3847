// Warnings about the document as a whole rather than a single field
use super::{SheetContext, ValidationRule};
use shared_types::{Finding, FindingKind};

/// Surfaces the layout analyzer's problems as one warning
pub struct LayoutRule;

impl ValidationRule for LayoutRule {
    fn name(&self) -> &str {
        "layout"
    }

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding> {
        if !sheet.layout.has_alignment_issues {
            return vec![];
        }

        vec![Finding::warning(
            FindingKind::LayoutIssue,
            "Title block layout problems detected",
            sheet.layout.formatting_problems.join("; "),
        )]
    }
}

/// Very little text usually means a scanned, image-only sheet
pub struct LowContentRule {
    min_chars: usize,
}

impl LowContentRule {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl ValidationRule for LowContentRule {
    fn name(&self) -> &str {
        "low_content"
    }

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding> {
        let chars = sheet.record.raw_text.chars().count();
        if chars >= self.min_chars {
            return vec![];
        }

        vec![Finding::warning(
            FindingKind::LowContent,
            "Very little text extracted; the document may be image-only",
            format!("{} characters extracted, minimum {}", chars, self.min_chars),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutReport;
    use crate::rules::fixtures::run;
    use shared_types::{ExtractedRecord, Severity};

    #[test]
    fn test_layout_problems_joined() {
        let record = ExtractedRecord::default();
        let layout = LayoutReport {
            has_alignment_issues: true,
            formatting_problems: vec!["first".to_string(), "second".to_string()],
            title_block_item_count: 3,
            total_text_items: 10,
        };
        let findings = LayoutRule.check(&SheetContext {
            record: &record,
            revisions: &[],
            layout: &layout,
            template: None,
        });
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::LayoutIssue);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].details, "first; second");
    }

    #[test]
    fn test_clean_layout_passes() {
        assert!(run(&LayoutRule, &ExtractedRecord::default(), &[]).is_empty());
    }

    #[test]
    fn test_low_content_threshold() {
        let rule = LowContentRule::new(10);
        let short = ExtractedRecord {
            raw_text: "ESC 1:50".to_string(),
            ..Default::default()
        };
        let enough = ExtractedRecord {
            raw_text: "LÁMINA 6-S8".to_string(),
            ..Default::default()
        };

        let findings = run(&rule, &short, &[]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::LowContent);
        assert_eq!(findings[0].details, "8 characters extracted, minimum 10");
        assert!(run(&rule, &enough, &[]).is_empty());
    }

    #[test]
    fn test_low_content_counts_characters_not_bytes() {
        // 9 characters, 11 bytes
        let record = ExtractedRecord {
            raw_text: "ÑÑ 1234567".chars().take(9).collect(),
            ..Default::default()
        };
        assert_eq!(run(&LowContentRule::new(10), &record, &[]).len(), 1);
    }
}
