//! Revision date rules
//!
//! Dates are compared as calendar days (`DD/MM/YYYY`). A date that does not
//! parse is reported once by [`InvalidDateRule`] and skipped by the stage
//! sequence checks.

use super::{SheetContext, ValidationRule};
use crate::calendar::parse_revision_date;
use crate::patterns::{fold_key, FINAL_DESIGN_STAGE, MODIFICATION_STAGE, PRELIMINARY_STAGE};
use chrono::NaiveDate;
use shared_types::{Finding, FindingKind, RevisionEntry};
use std::collections::HashMap;

/// One error listing every date shared by two or more revisions
pub struct DuplicateDatesRule;

impl ValidationRule for DuplicateDatesRule {
    fn name(&self) -> &str {
        "duplicate_dates"
    }

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for revision in sheet.revisions {
            let count = counts.entry(revision.date.as_str()).or_insert(0);
            if *count == 0 {
                first_seen.push(revision.date.as_str());
            }
            *count += 1;
        }

        let duplicated: Vec<&str> = first_seen
            .into_iter()
            .filter(|date| counts[date] > 1)
            .collect();

        if duplicated.is_empty() {
            return vec![];
        }

        vec![Finding::error(
            FindingKind::DuplicateDates,
            "Several revisions share the same date",
            format!("Repeated dates: {}", duplicated.join(", ")),
        )]
    }
}

/// Revision dates that are not real calendar days (32/01/2024, 10/13/2024)
pub struct InvalidDateRule;

impl ValidationRule for InvalidDateRule {
    fn name(&self) -> &str {
        "invalid_date"
    }

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding> {
        sheet
            .revisions
            .iter()
            .filter(|revision| parse_revision_date(&revision.date).is_none())
            .map(|revision| {
                Finding::error(
                    FindingKind::InvalidDate,
                    format!("Revision {} has an impossible date", revision.number),
                    format!(
                        "Revision {} ({}): {} is not a valid DD/MM/YYYY date",
                        revision.number, revision.description, revision.date
                    ),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preliminary,
    FinalDesign,
    Modification,
}

impl Stage {
    /// Stage named by a revision description. "Modificación de proyecto
    /// definitivo" is a modification, not a final design.
    pub fn classify(description: &str) -> Option<Stage> {
        let key = fold_key(description);
        if MODIFICATION_STAGE.is_match(&key) {
            Some(Stage::Modification)
        } else if PRELIMINARY_STAGE.is_match(&key) {
            Some(Stage::Preliminary)
        } else if FINAL_DESIGN_STAGE.is_match(&key) {
            Some(Stage::FinalDesign)
        } else {
            None
        }
    }
}

/// Chronology between preliminary, final design and modification stages
pub struct StageSequenceRule;

impl StageSequenceRule {
    fn dated(revisions: &[RevisionEntry], stage: Stage) -> Vec<(&RevisionEntry, NaiveDate)> {
        revisions
            .iter()
            .filter(|r| Stage::classify(&r.description) == Some(stage))
            .filter_map(|r| parse_revision_date(&r.date).map(|date| (r, date)))
            .collect()
    }
}

impl ValidationRule for StageSequenceRule {
    fn name(&self) -> &str {
        "stage_sequence"
    }

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        // The first final-design entry is the reference point
        let Some(&(final_design, final_date)) =
            Self::dated(sheet.revisions, Stage::FinalDesign).first()
        else {
            return findings;
        };

        for (modification, modification_date) in Self::dated(sheet.revisions, Stage::Modification) {
            if modification_date == final_date {
                findings.push(Finding::error(
                    FindingKind::SameDateLogic,
                    "Modification has the same date as the final design",
                    format!(
                        "Revision {} ({}) and revision {} ({}) are both dated {}",
                        final_design.number,
                        final_design.description,
                        modification.number,
                        modification.description,
                        modification.date
                    ),
                ));
            } else if modification_date < final_date {
                findings.push(Finding::error(
                    FindingKind::SequenceViolation,
                    "Modification is dated before the final design",
                    format!(
                        "Revision {} ({}) dated {} precedes revision {} ({}) dated {}",
                        modification.number,
                        modification.description,
                        modification.date,
                        final_design.number,
                        final_design.description,
                        final_design.date
                    ),
                ));
            }
        }

        if let Some(&(preliminary, preliminary_date)) =
            Self::dated(sheet.revisions, Stage::Preliminary).first()
        {
            if final_date <= preliminary_date {
                findings.push(Finding::error(
                    FindingKind::PreliminarySequenceViolation,
                    "Final design is not dated after the preliminary design",
                    format!(
                        "Preliminary {} ({}) dated {}, final design {} ({}) dated {}",
                        preliminary.number,
                        preliminary.description,
                        preliminary.date,
                        final_design.number,
                        final_design.description,
                        final_design.date
                    ),
                ));
            }
        }

        findings
    }
}
