//! Validation rules for extracted sheet metadata
//!
//! Every rule looks at the same [`SheetContext`] and returns the findings it
//! produced, possibly none. Rules never fail and never depend on each other,
//! so the order they run in does not change the outcome.

pub mod architect;
pub mod content;
pub mod dates;
pub mod project;
pub mod scale;
pub mod template;

use crate::config::ValidatorConfig;
use crate::layout::LayoutReport;
use shared_types::{ExtractedRecord, Finding, RevisionEntry, RevisionTemplate};

pub use architect::ArchitectNameRule;
pub use content::{LayoutRule, LowContentRule};
pub use dates::{DuplicateDatesRule, InvalidDateRule, StageSequenceRule};
pub use project::ProjectNameRule;
pub use scale::ScaleRule;
pub use template::TemplateRule;

/// Everything a rule may look at for one document
#[derive(Debug, Clone, Copy)]
pub struct SheetContext<'a> {
    pub record: &'a ExtractedRecord,
    pub revisions: &'a [RevisionEntry],
    pub layout: &'a LayoutReport,
    pub template: Option<&'a RevisionTemplate>,
}

pub trait ValidationRule: Send + Sync {
    /// Short identifier, used in logs
    fn name(&self) -> &str;

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding>;
}

/// The full rule set, parameterized by configuration
pub fn all_rules(config: &ValidatorConfig) -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(ArchitectNameRule::new(&config.reference.architect)),
        Box::new(ProjectNameRule::new(config.reference.project_name.clone())),
        Box::new(DuplicateDatesRule),
        Box::new(InvalidDateRule),
        Box::new(StageSequenceRule),
        Box::new(TemplateRule),
        Box::new(LayoutRule),
        Box::new(LowContentRule::new(config.min_text_length)),
        Box::new(ScaleRule::new(
            config.acceptable_scales.clone(),
            config.detail_scales.clone(),
        )),
    ]
}
