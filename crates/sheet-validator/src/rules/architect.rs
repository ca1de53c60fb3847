// Architect name check against the configured reference name
use super::{SheetContext, ValidationRule};
use crate::patterns::{fold_accents, has_accent, normalize_name};
use shared_types::{Finding, FindingKind};

pub struct ArchitectNameRule {
    reference: String,
}

/// How an extracted name differs from the reference, most specific first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameDiscrepancy {
    /// Reference followed by exactly one extra letter ("Ortizs")
    ExtraLetter,
    /// Same name once accents are ignored, with accents the reference has left out
    Accent,
    /// In-order subset of the reference tokens
    Incomplete { missing: Vec<String> },
    Mismatch { missing: Vec<String>, extra: Vec<String> },
}

impl ArchitectNameRule {
    pub fn new(reference: &str) -> Self {
        Self {
            reference: normalize_name(reference),
        }
    }

    /// `None` when `found` is the reference name (case-insensitive)
    pub fn classify(&self, found: &str) -> Option<NameDiscrepancy> {
        let original = normalize_name(found);
        let found = original.to_lowercase();
        let reference = self.reference.to_lowercase();
        if found == reference {
            return None;
        }

        // 1. One trailing letter too many
        if let Some(rest) = found.strip_prefix(reference.as_str()) {
            let mut chars = rest.chars();
            if matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic()) {
                return Some(NameDiscrepancy::ExtraLetter);
            }
        }

        // 2. Accents only
        let found_folded = fold_accents(&found);
        let reference_folded = fold_accents(&reference);
        if found_folded == reference_folded && only_drops_accents(&found, &reference) {
            return Some(NameDiscrepancy::Accent);
        }

        // 3. Components dropped, order kept
        let found_tokens: Vec<&str> = found_folded.split_whitespace().collect();
        let reference_tokens: Vec<&str> = reference_folded.split_whitespace().collect();
        if !found_tokens.is_empty()
            && found_tokens.len() < reference_tokens.len()
            && is_subsequence(&found_tokens, &reference_tokens)
        {
            return Some(NameDiscrepancy::Incomplete {
                missing: self.missing_tokens(&found_tokens),
            });
        }

        Some(NameDiscrepancy::Mismatch {
            missing: self.missing_tokens(&found_tokens),
            extra: original
                .split_whitespace()
                .filter(|t| {
                    !reference_tokens.contains(&fold_accents(&t.to_lowercase()).as_str())
                })
                .map(str::to_string)
                .collect(),
        })
    }

    /// Reference tokens (original spelling) absent from `found_tokens` (folded)
    fn missing_tokens(&self, found_tokens: &[&str]) -> Vec<String> {
        self.reference
            .split_whitespace()
            .filter(|t| !found_tokens.contains(&fold_accents(&t.to_lowercase()).as_str()))
            .map(str::to_string)
            .collect()
    }
}

/// Every character that differs is an accented reference letter written plain.
/// Both names fold to the same text, so they have the same length in chars.
fn only_drops_accents(found: &str, reference: &str) -> bool {
    found
        .chars()
        .zip(reference.chars())
        .all(|(f, r)| f == r || !has_accent(f.encode_utf8(&mut [0; 4])))
}

fn is_subsequence(needle: &[&str], haystack: &[&str]) -> bool {
    let mut remaining = haystack.iter();
    needle
        .iter()
        .all(|token| remaining.any(|candidate| candidate == token))
}

impl ValidationRule for ArchitectNameRule {
    fn name(&self) -> &str {
        "architect_name"
    }

    fn check(&self, sheet: &SheetContext<'_>) -> Vec<Finding> {
        let found = normalize_name(&sheet.record.architect);
        if found.is_empty() {
            return vec![Finding::warning(
                FindingKind::ArchitectNameMissing,
                "Could not extract the architect name",
                format!("Expected: '{}'", self.reference),
            )];
        }

        let Some(discrepancy) = self.classify(&found) else {
            return vec![];
        };

        let compared = format!("Found: '{}', expected: '{}'", found, self.reference);
        let finding = match discrepancy {
            NameDiscrepancy::ExtraLetter => Finding::error(
                FindingKind::ArchitectNameTypo,
                "Architect name has an extra letter",
                compared,
            ),
            NameDiscrepancy::Accent => Finding::error(
                FindingKind::ArchitectNameAccent,
                "Architect name is missing an accent",
                compared,
            ),
            NameDiscrepancy::Incomplete { missing } => Finding::error(
                FindingKind::ArchitectNameIncomplete,
                "Architect name is incomplete",
                format!("{}, missing: {}", compared, missing.join(", ")),
            ),
            NameDiscrepancy::Mismatch { missing, extra } => {
                let mut details = compared;
                if !missing.is_empty() {
                    details.push_str(&format!(", missing: {}", missing.join(", ")));
                }
                if !extra.is_empty() {
                    details.push_str(&format!(", unexpected: {}", extra.join(", ")));
                }
                Finding::error(
                    FindingKind::ArchitectNameMismatch,
                    "Architect name does not match the standard",
                    details,
                )
            }
        };
        vec![finding]
    }
}
