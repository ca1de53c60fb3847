//! Validator configuration
//!
//! Reference values (the canonical architect name, the project name) and the
//! calibration constants of the heuristics live here rather than in the rule
//! code. Everything has a default so an empty TOML file is a valid config.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared_types::RevisionTemplate;
use std::fs;
use std::path::Path;

/// Top-level configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Values a conformant title block must carry
    #[serde(default)]
    pub reference: ReferenceValues,
    /// Title-block geometry used by the layout analyzer
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Bounds on the external extraction step
    #[serde(default)]
    pub limits: ExtractionLimits,
    /// Acceptable `1:N` ratios, stored as N
    #[serde(default = "default_acceptable_scales")]
    pub acceptable_scales: Vec<u32>,
    /// Below this many characters a document is treated as image-only
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,
    /// Scale expected for particular detail sheets
    #[serde(default = "default_detail_scales")]
    pub detail_scales: Vec<DetailScaleRule>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceValues::default(),
            layout: LayoutConfig::default(),
            limits: ExtractionLimits::default(),
            acceptable_scales: default_acceptable_scales(),
            min_text_length: default_min_text_length(),
            detail_scales: default_detail_scales(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Whether `1:ratio` is one of the configured acceptable scales
    pub fn is_acceptable_scale(&self, ratio: u32) -> bool {
        self.acceptable_scales.contains(&ratio)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceValues {
    /// Canonical architect name, accents included
    #[serde(default = "default_architect")]
    pub architect: String,
    /// Project name every sheet of the delivery must show
    #[serde(default)]
    pub project_name: Option<String>,
}

impl Default for ReferenceValues {
    fn default() -> Self {
        Self {
            architect: default_architect(),
            project_name: None,
        }
    }
}

fn default_architect() -> String {
    "Javier Andrés Moya Ortiz".to_string()
}

/// Title-block band and page window, in extractor coordinate units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_title_block_x_min")]
    pub title_block_x_min: f64,
    #[serde(default = "default_title_block_y_min")]
    pub title_block_y_min: f64,
    #[serde(default = "default_title_block_y_max")]
    pub title_block_y_max: f64,
    #[serde(default = "default_page_x_min")]
    pub page_x_min: f64,
    #[serde(default = "default_page_x_max")]
    pub page_x_max: f64,
    /// Left edges within 3x this spread count as aligned
    #[serde(default = "default_alignment_tolerance")]
    pub alignment_tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title_block_x_min: default_title_block_x_min(),
            title_block_y_min: default_title_block_y_min(),
            title_block_y_max: default_title_block_y_max(),
            page_x_min: default_page_x_min(),
            page_x_max: default_page_x_max(),
            alignment_tolerance: default_alignment_tolerance(),
        }
    }
}

fn default_title_block_x_min() -> f64 {
    500.0
}

fn default_title_block_y_min() -> f64 {
    0.0
}

fn default_title_block_y_max() -> f64 {
    250.0
}

fn default_page_x_min() -> f64 {
    0.0
}

// A0 landscape is 3370pt wide; anything past that is off the sheet
fn default_page_x_max() -> f64 {
    3370.0
}

fn default_alignment_tolerance() -> f64 {
    2.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionLimits {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_pages: default_max_pages(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_pages() -> u32 {
    20
}

fn default_max_document_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_acceptable_scales() -> Vec<u32> {
    vec![
        1, 2, 5, 10, 20, 25, 50, 75, 100, 125, 200, 250, 500, 750, 1000, 2000,
    ]
}

fn default_min_text_length() -> usize {
    100
}

/// Detail sheets whose document type contains `keyword` should be drawn at `scale`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailScaleRule {
    pub keyword: String,
    pub scale: String,
    /// Reminder raised on every matching sheet as a `DETAIL_FORMATTING` warning
    #[serde(default)]
    pub formatting_note: Option<String>,
}

fn default_detail_scales() -> Vec<DetailScaleRule> {
    vec![
        DetailScaleRule {
            keyword: "baño".to_string(),
            scale: "1:25".to_string(),
            formatting_note: Some(
                "Text in bathroom elevations must be precisely aligned".to_string(),
            ),
        },
        DetailScaleRule {
            keyword: "closet".to_string(),
            scale: "1:25".to_string(),
            formatting_note: None,
        },
    ]
}

/// Load a revision template from a `.toml` or `.json` file
pub fn load_template<P: AsRef<Path>>(path: P) -> anyhow::Result<RevisionTemplate> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file: {}", path.display()))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON template: {}", path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML template: {}", path.display()))
    }
}
