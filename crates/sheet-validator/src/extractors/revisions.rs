// Revision table parsing: "<number> <stage label> <DD/MM/YYYY>"
//
// Three patterns of decreasing specificity all run over the whole text. They
// overlap on purpose, so the same row usually comes back from two or three of
// them and the results are deduplicated by (number, description, date).
//
// The loose pattern accepts any capitalized phrase between a number and a
// date. It will also pick up numbered lists that are not revision rows; every
// entry carries `pattern_used` so callers can drop LOOSE_PATTERN hits.
//
// A description that is only a title-block label ("LÁMINA 9 FECHA 15/01/2024")
// is the title block's own date, not a revision.
use crate::patterns::{clean_text, is_label, DATE_SHAPE};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::RevisionEntry;
use std::collections::HashSet;

/// Closed stage vocabulary
pub const STAGE_PATTERN: usize = 0;
/// Upper-case phrase
pub const UPPERCASE_PATTERN: usize = 1;
/// Any capitalized phrase
pub const LOOSE_PATTERN: usize = 2;

// Number and date are captured loosely; the date shape is checked afterwards.
const NUMBER: &str = r"\b(\d{1,2}(?:\.\d{1,2})?)";
const DATE: &str = r"(\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4})\b";

lazy_static! {
    static ref REVISION_PATTERNS: [Regex; 3] = [
        Regex::new(&format!(
            r"{}\s+((?i:ANTEPROYECTO|PROYECTO\s+DEFINITIVO|MODIFICACI[OÓ]N\s+DE\s+PROYECTO|PERMISO\s+DE\s+EDIFICACI[OÓ]N|RECEPCI[OÓ]N\s+FINAL|PRELIMINARY\s+DESIGN|FINAL\s+DESIGN|DESIGN\s+MODIFICATION))\s+{}",
            NUMBER, DATE
        ))
        .unwrap(),
        Regex::new(&format!(r"{}\s+(\p{{Lu}}[\p{{Lu}}\s]{{2,60}}?)\s+{}", NUMBER, DATE)).unwrap(),
        Regex::new(&format!(r"{}\s+(\p{{Lu}}[\p{{L}}\s]{{2,60}}?)\s+{}", NUMBER, DATE)).unwrap(),
    ];
}

/// Parse every revision row in `text`, in source order, without duplicates
pub fn parse_revisions(text: &str) -> Vec<RevisionEntry> {
    let text = clean_text(text);
    let mut candidates = Vec::new();

    for (pattern_used, re) in REVISION_PATTERNS.iter().enumerate() {
        for caps in re.captures_iter(&text) {
            let (Some(whole), Some(number), Some(description), Some(date)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };

            if !DATE_SHAPE.is_match(date.as_str()) || is_label(description.as_str()) {
                continue;
            }

            candidates.push(RevisionEntry {
                number: number.as_str().to_string(),
                description: clean_text(description.as_str()),
                date: date.as_str().to_string(),
                full_match: whole.as_str().to_string(),
                pattern_used,
                position: whole.start(),
            });
        }
    }

    // Source order first; at the same offset the more specific pattern wins the dedupe
    candidates.sort_by_key(|entry| (entry.position, entry.pattern_used));
    dedupe_revisions(candidates)
}

/// Drop every entry whose (number, description, date) was already seen
pub fn dedupe_revisions(entries: Vec<RevisionEntry>) -> Vec<RevisionEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            seen.insert((
                entry.number.clone(),
                entry.description.clone(),
                entry.date.clone(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn triples(entries: &[RevisionEntry]) -> Vec<(&str, &str, &str)> {
        entries
            .iter()
            .map(|e| (e.number.as_str(), e.description.as_str(), e.date.as_str()))
            .collect()
    }

    #[test]
    fn test_parses_revision_table() {
        let text = "REV DESCRIPCIÓN FECHA 1 PROYECTO DEFINITIVO 15/01/2024 \
                    2 MODIFICACIÓN DE PROYECTO 13/08/2024";
        let revisions = parse_revisions(text);
        assert_eq!(
            triples(&revisions),
            vec![
                ("1", "PROYECTO DEFINITIVO", "15/01/2024"),
                ("2", "MODIFICACIÓN DE PROYECTO", "13/08/2024"),
            ]
        );
        assert_eq!(revisions[0].pattern_used, STAGE_PATTERN);
        assert!(revisions[0].position < revisions[1].position);
    }

    #[test]
    fn test_overlapping_patterns_collapse_to_one_entry() {
        let revisions = parse_revisions("1 ANTEPROYECTO 02/03/2023");
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].full_match, "1 ANTEPROYECTO 02/03/2023");
    }

    #[test]
    fn test_uppercase_and_loose_phrases() {
        let revisions =
            parse_revisions("3 CAMBIO DE TERMINACIONES 01/09/2024 4 Ajuste de cotas 05/09/2024");
        assert_eq!(
            triples(&revisions),
            vec![
                ("3", "CAMBIO DE TERMINACIONES", "01/09/2024"),
                ("4", "Ajuste de cotas", "05/09/2024"),
            ]
        );
        assert_eq!(revisions[0].pattern_used, UPPERCASE_PATTERN);
        assert_eq!(revisions[1].pattern_used, LOOSE_PATTERN);
    }

    #[test]
    fn test_rejects_malformed_dates() {
        assert!(parse_revisions("1 PROYECTO DEFINITIVO 15.01.2024").is_empty());
        assert!(parse_revisions("1 PROYECTO DEFINITIVO 15/01/24").is_empty());
    }

    #[test]
    fn test_title_block_label_is_not_a_revision() {
        let text = "LÁMINA 9 FECHA 15/01/2024 REV 1 PROYECTO DEFINITIVO 15/01/2024";
        assert_eq!(
            triples(&parse_revisions(text)),
            vec![("1", "PROYECTO DEFINITIVO", "15/01/2024")]
        );
        assert!(parse_revisions("HOJA 3 Fecha 01/02/2024").is_empty());
        assert!(parse_revisions("PLANO 2 ESCALA 10/10/2024").is_empty());
    }

    #[test]
    fn test_keeps_dotted_numbers_as_strings() {
        let revisions = parse_revisions("1.1 MODIFICACIÓN DE PROYECTO 20/08/2024");
        assert_eq!(revisions[0].number, "1.1");
    }

    #[test]
    fn test_no_revisions_is_empty() {
        assert!(parse_revisions("PROYECTO: Casa hermanos ESC 1:50").is_empty());
        assert!(parse_revisions("").is_empty());
    }

    #[test]
    fn test_same_row_twice_is_deduplicated() {
        let text = "1 PROYECTO DEFINITIVO 15/01/2024 1 PROYECTO DEFINITIVO 15/01/2024";
        assert_eq!(parse_revisions(text).len(), 1);
    }
}
