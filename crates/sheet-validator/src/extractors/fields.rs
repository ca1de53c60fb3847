//! Title-block field extraction
//!
//! Each field owns an ordered list of [`FieldRule`]s, most specific first
//! (known exact value, then "label: value", then loose fallbacks). A small
//! interpreter walks the list and the first rule that matches decides the
//! value; later rules are not evaluated. A field no rule matches stays empty.

use crate::config::ValidatorConfig;
use crate::error::ValidatorError;
use crate::patterns::{
    clean_text, normalize_name, truncate_at_label, DOCUMENT_TYPES, LABEL_ALTERNATION,
    MONTH_ALTERNATION,
};
use regex::Regex;
use shared_types::ExtractedRecord;
use tracing::debug;

/// Capitalized name word: "Javier", "Andrés", "Abu-ghosh", "O'Ryan"
const NAME_WORD: &str = r"\p{Lu}[\p{Ll}'’]+(?:-\p{L}\p{Ll}*)?";

/// Title-block fields the extractor fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProjectName,
    Architect,
    Owner,
    Address,
    TitleDate,
    Sheet,
    DocumentType,
    Scale,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ProjectName => "project_name",
            Field::Architect => "architect",
            Field::Owner => "owner",
            Field::Address => "address",
            Field::TitleDate => "title_date",
            Field::Sheet => "sheet",
            Field::DocumentType => "document_type",
            Field::Scale => "scale",
        }
    }
}

/// What a matching rule contributes to its field
#[derive(Debug, Clone)]
enum RuleOutput {
    /// Capture group 1 when the pattern has one, the whole match otherwise
    Capture,
    /// Fixed label, for closed vocabularies
    Canonical(&'static str),
}

/// One candidate pattern for a field
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: &'static str,
    pattern: Regex,
    output: RuleOutput,
}

impl FieldRule {
    fn capture(field: Field, name: &'static str, pattern: &str) -> Result<Self, ValidatorError> {
        Ok(Self {
            name,
            pattern: compile(field, pattern)?,
            output: RuleOutput::Capture,
        })
    }

    fn canonical(
        field: Field,
        name: &'static str,
        pattern: &str,
        label: &'static str,
    ) -> Result<Self, ValidatorError> {
        Ok(Self {
            name,
            pattern: compile(field, pattern)?,
            output: RuleOutput::Canonical(label),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Value this rule yields for `text`, if it matches
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let value = match self.output {
            RuleOutput::Canonical(label) => label.to_string(),
            RuleOutput::Capture => caps
                .get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().trim().to_string())?,
        };

        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

fn compile(field: Field, pattern: &str) -> Result<Regex, ValidatorError> {
    Regex::new(pattern).map_err(|source| ValidatorError::Pattern {
        field: field.as_str(),
        source,
    })
}

/// A field's value and the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub value: String,
    pub rule: &'static str,
}

/// Ordered rule list for one field plus its cleanup step
#[derive(Debug, Clone)]
pub struct FieldCascade {
    field: Field,
    rules: Vec<FieldRule>,
    normalize: fn(&str) -> String,
}

impl FieldCascade {
    /// First rule that yields a non-empty value wins
    pub fn evaluate(&self, text: &str) -> Option<FieldMatch> {
        self.rules.iter().find_map(|rule| {
            let value = (self.normalize)(&rule.apply(text)?);
            (!value.is_empty()).then(|| FieldMatch {
                value,
                rule: rule.name(),
            })
        })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

/// Builds an [`ExtractedRecord`] from cleaned document text
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    cascades: Vec<FieldCascade>,
}

impl FieldExtractor {
    pub fn new(config: &ValidatorConfig) -> Result<Self, ValidatorError> {
        let cascades = vec![
            project_rules(config.reference.project_name.as_deref())?,
            architect_rules(&config.reference.architect)?,
            owner_rules()?,
            address_rules()?,
            title_date_rules()?,
            sheet_rules()?,
            document_type_rules()?,
            scale_rules(&config.acceptable_scales)?,
        ];
        Ok(Self { cascades })
    }

    pub fn cascade(&self, field: Field) -> Option<&FieldCascade> {
        self.cascades.iter().find(|c| c.field == field)
    }

    /// Run a single field's cascade
    pub fn evaluate(&self, field: Field, text: &str) -> Option<FieldMatch> {
        self.cascade(field).and_then(|c| c.evaluate(text))
    }

    /// Fill every field it can. `revision_dates` is left for the revision parser.
    pub fn extract(&self, text: &str) -> ExtractedRecord {
        let text = clean_text(text);
        let mut record = ExtractedRecord {
            raw_text: text.clone(),
            ..Default::default()
        };

        for cascade in &self.cascades {
            let Some(found) = cascade.evaluate(&text) else {
                debug!(field = cascade.field.as_str(), "no rule matched");
                continue;
            };
            debug!(
                field = cascade.field.as_str(),
                rule = found.rule,
                value = %found.value,
                "field extracted"
            );

            let slot = match cascade.field {
                Field::ProjectName => &mut record.project_name,
                Field::Architect => &mut record.architect,
                Field::Owner => &mut record.owner,
                Field::Address => &mut record.address,
                Field::TitleDate => &mut record.title_date,
                Field::Sheet => &mut record.sheet,
                Field::DocumentType => &mut record.document_type,
                Field::Scale => &mut record.scale,
            };
            *slot = found.value;
        }

        record
    }
}

/// "label: value" where value runs until the next title-block label or the end
fn until_next_label(labels: &str, min: usize, max: usize) -> String {
    format!(
        r"(?i:\b(?:{labels})\b)\s*:?\s*(.{{{min},{max}}}?)\s*(?:(?i:\b(?:{stop})\b)|$)",
        labels = labels,
        min = min,
        max = max,
        stop = LABEL_ALTERNATION,
    )
}

/// Literal value, case-insensitive, any whitespace between words
fn literal(value: &str) -> String {
    let words: Vec<String> = value.split_whitespace().map(regex::escape).collect();
    format!(r"(?i)\b{}\b", words.join(r"\s+"))
}

/// Person names are captured as runs of capitalized words, which also swallow
/// a title-case label that follows ("Ortiz Propietario"); cut the value there.
fn normalize_person(value: &str) -> String {
    normalize_name(truncate_at_label(value))
}

fn name_sequence() -> String {
    format!(
        r"{w}(?:\s+(?:(?i:de|del|la|las|los|y)\s+)?{w}){{1,5}}",
        w = NAME_WORD
    )
}

fn project_rules(reference: Option<&str>) -> Result<FieldCascade, ValidatorError> {
    let field = Field::ProjectName;
    let mut rules = Vec::new();

    if let Some(reference) = reference.filter(|r| !r.trim().is_empty()) {
        rules.push(FieldRule::capture(field, "reference", &literal(reference))?);
    }
    rules.push(FieldRule::capture(
        field,
        "labeled",
        &format!(
            r"(?i:\b(?:NOMBRE\s+DEL\s+PROYECTO|PROJECT\s+NAME|PROYECTO|PROJECT|OBRA)\b)\s*:\s*(.{{2,80}}?)\s*(?:(?i:\b(?:{stop})\b)|$)",
            stop = LABEL_ALTERNATION
        ),
    )?);
    rules.push(FieldRule::capture(
        field,
        "building-phrase",
        r"(?i:\b(?:CASA|VIVIENDA|EDIFICIO|AMPLIACI[OÓ]N|REMODELACI[OÓ]N)\b)(?:\s+\p{Lu}?\p{Ll}+){1,4}",
    )?);

    Ok(FieldCascade {
        field,
        rules,
        normalize: clean_text,
    })
}

fn architect_rules(reference: &str) -> Result<FieldCascade, ValidatorError> {
    let field = Field::Architect;
    let mut rules = Vec::new();

    if !reference.trim().is_empty() {
        rules.push(FieldRule::capture(field, "reference", &literal(reference))?);
    }
    rules.push(FieldRule::capture(
        field,
        "labeled",
        &format!(
            r"(?i:\b(?:ARQUITECT[OA]|ARCHITECT)\b)\s*:?\s*({})",
            name_sequence()
        ),
    )?);
    rules.push(FieldRule::capture(
        field,
        "abbreviated",
        &format!(r"(?i:\bARQ\.?)\s+({})", name_sequence()),
    )?);
    rules.push(FieldRule::capture(
        field,
        "label-to-next-label",
        &until_next_label("ARQUITECT[OA]|ARCHITECT", 5, 60),
    )?);

    Ok(FieldCascade {
        field,
        rules,
        normalize: normalize_person,
    })
}

fn owner_rules() -> Result<FieldCascade, ValidatorError> {
    let field = Field::Owner;
    let labels = "PROPIETARI[OA]|MANDANTE|OWNER|CLIENTE|CLIENT";
    let rules = vec![
        FieldRule::capture(
            field,
            "labeled",
            &format!(r"(?i:\b(?:{}))\b\s*:?\s*({})", labels, name_sequence()),
        )?,
        FieldRule::capture(field, "label-to-next-label", &until_next_label(labels, 3, 80))?,
    ];

    Ok(FieldCascade {
        field,
        rules,
        normalize: normalize_person,
    })
}

fn address_rules() -> Result<FieldCascade, ValidatorError> {
    let field = Field::Address;
    let rules = vec![
        FieldRule::capture(
            field,
            "labeled",
            &until_next_label(r"DIRECCI[OÓ]N|UBICACI[OÓ]N|ADDRESS", 3, 100),
        )?,
        FieldRule::capture(
            field,
            "street",
            r"((?i:\b(?:avenida|av\.|calle|pasaje|psje\.|camino)\s+)[\p{L}\s.]{2,60}?\s+\d{1,6})\b",
        )?,
        FieldRule::capture(
            field,
            "words-and-number",
            r"(\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+){1,4}\s+\d{3,6})\b",
        )?,
    ];

    Ok(FieldCascade {
        field,
        rules,
        normalize: clean_text,
    })
}

fn title_date_rules() -> Result<FieldCascade, ValidatorError> {
    let field = Field::TitleDate;
    let rules = vec![
        FieldRule::capture(
            field,
            "labeled-numeric",
            r"(?i:\b(?:FECHA|DATE)\b)\s*:?\s*(\d{1,2}/\d{1,2}/\d{4})",
        )?,
        FieldRule::capture(
            field,
            "labeled-month",
            &format!(
                r"(?i:\b(?:FECHA|DATE)\b)\s*:?\s*((?i:{months})\s+(?:(?i:de)\s+)?\d{{4}})",
                months = MONTH_ALTERNATION
            ),
        )?,
        FieldRule::capture(
            field,
            "month-year",
            &format!(
                r"\b((?i:{months})\s+(?:(?i:de)\s+)?\d{{4}})\b",
                months = MONTH_ALTERNATION
            ),
        )?,
    ];

    Ok(FieldCascade {
        field,
        rules,
        normalize: clean_text,
    })
}

fn sheet_rules() -> Result<FieldCascade, ValidatorError> {
    let field = Field::Sheet;
    let rules = vec![
        FieldRule::capture(
            field,
            "labeled",
            r"(?i:\b(?:L[AÁ]MINA|PLANO|SHEET)\b)\s*(?:(?i:N[°º]|NO\.|NRO\.?|#))?\s*:?\s*(\d{1,3}(?:-[A-Z]{0,2}\d{1,3})?|[A-Z]{1,3}-?\d{1,3})\b",
        )?,
        FieldRule::capture(field, "sheet-code", r"\b(\d{1,3}-[A-Z]{1,2}\d{1,3})\b")?,
    ];

    Ok(FieldCascade {
        field,
        rules,
        normalize: clean_text,
    })
}

fn document_type_rules() -> Result<FieldCascade, ValidatorError> {
    let field = Field::DocumentType;
    let rules = DOCUMENT_TYPES
        .iter()
        .map(|&(pattern, label)| {
            FieldRule::canonical(field, label, &format!("(?i){}", pattern), label)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FieldCascade {
        field,
        rules,
        normalize: |value| value.to_string(),
    })
}

fn scale_rules(acceptable: &[u32]) -> Result<FieldCascade, ValidatorError> {
    let field = Field::Scale;
    let mut rules = vec![
        FieldRule::capture(
            field,
            "labeled-ratio",
            r"(?i:\b(?:ESCALA|ESC|SCALE)\b)\.?\s*:?\s*(1\s*:\s*\d{1,5})\b",
        )?,
        FieldRule::capture(
            field,
            "labeled-word",
            r"(?i:\b(?:ESCALA|ESC|SCALE)\b)\.?\s*:?\s*((?i:indicad[ao]s?|as\s+indicated|indicated|sin\s+escala|s/e|n\.?t\.?s\.?))",
        )?,
    ];

    // Unlabeled ratios are only trusted when they are a known drawing scale
    if !acceptable.is_empty() {
        let ratios: Vec<String> = acceptable.iter().map(|n| n.to_string()).collect();
        rules.push(FieldRule::capture(
            field,
            "acceptable-ratio",
            &format!(r"\b(1\s*:\s*(?:{}))\b", ratios.join("|")),
        )?);
    }

    Ok(FieldCascade {
        field,
        rules,
        normalize: normalize_scale,
    })
}

/// "1 : 50" becomes "1:50"; words are kept as written
fn normalize_scale(value: &str) -> String {
    if value.contains(':') && value.trim_start().starts_with('1') {
        value.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        clean_text(value)
    }
}

/// N from a "1:N" scale string
pub fn scale_ratio(scale: &str) -> Option<u32> {
    scale
        .strip_prefix("1:")
        .and_then(|n| n.trim().parse::<u32>().ok())
}
