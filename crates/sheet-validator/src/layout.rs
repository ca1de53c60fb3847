//! Title-block layout heuristics
//!
//! Coordinate-threshold checks over the positioned fragments. The bands come
//! from [`LayoutConfig`] and are calibration data for one family of sheets;
//! this is not a layout engine.

use crate::config::LayoutConfig;
use crate::patterns::starts_with_layout_label;
use serde::{Deserialize, Serialize};
use shared_types::TextFragment;

/// Fragments shorter than this are ignored by the boundary check
const MIN_BOUNDARY_TEXT_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub has_alignment_issues: bool,
    pub formatting_problems: Vec<String>,
    pub title_block_item_count: usize,
    pub total_text_items: usize,
}

impl LayoutReport {
    /// Report for a document that yielded no positioned text at all
    pub fn empty() -> Self {
        Self {
            has_alignment_issues: true,
            formatting_problems: vec!["No text items found in document".to_string()],
            title_block_item_count: 0,
            total_text_items: 0,
        }
    }
}

pub struct LayoutAnalyzer;

impl LayoutAnalyzer {
    pub fn analyze(fragments: &[TextFragment], config: &LayoutConfig) -> LayoutReport {
        if fragments.is_empty() {
            return LayoutReport::empty();
        }

        let mut problems = Vec::new();

        let title_block: Vec<&TextFragment> = fragments
            .iter()
            .filter(|f| Self::in_title_block(f, config))
            .collect();

        // 1. Labeled title-block items should share a left edge
        let label_xs: Vec<f64> = title_block
            .iter()
            .filter(|f| starts_with_layout_label(&f.text))
            .map(|f| f.x)
            .collect();

        if label_xs.len() > 1 {
            let min_x = label_xs.iter().copied().fold(f64::INFINITY, f64::min);
            let max_x = label_xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let spread = max_x - min_x;
            if spread > config.alignment_tolerance * 3.0 {
                problems.push(format!(
                    "Inconsistent left alignment of title block labels (spread {:.1})",
                    spread
                ));
            }
        }

        // 2. Real text should sit inside the page window
        let outside = fragments
            .iter()
            .filter(|f| f.text.trim().chars().count() > MIN_BOUNDARY_TEXT_CHARS)
            .filter(|f| f.x < config.page_x_min || f.x > config.page_x_max)
            .count();
        if outside > 0 {
            problems.push(format!(
                "{} text item(s) positioned outside expected boundaries",
                outside
            ));
        }

        LayoutReport {
            has_alignment_issues: !problems.is_empty(),
            formatting_problems: problems,
            title_block_item_count: title_block.len(),
            total_text_items: fragments.len(),
        }
    }

    fn in_title_block(fragment: &TextFragment, config: &LayoutConfig) -> bool {
        fragment.y >= config.title_block_y_min
            && fragment.y <= config.title_block_y_max
            && fragment.x >= config.title_block_x_min
    }
}
