//! Title-block vocabularies and text normalization helpers

use lazy_static::lazy_static;
use regex::Regex;

/// Title-block labels, as a regex alternation. Used both to find a label and
/// to stop a "label: value" capture at the next label.
pub const LABEL_ALTERNATION: &str = r"ARQUITECT[OA]|ARCHITECT|PROYECTO|PROJECT|PROPIETARIO|MANDANTE|OWNER|CLIENTE|CLIENT|DIRECCI[OÓ]N|UBICACI[OÓ]N|ADDRESS|FECHA|DATE|L[AÁ]MINA|PLANO|SHEET|ESCALA|SCALE|CONTENIDO|CONTENT|REVISIONES|REVISIONS";

/// Month names accepted in a title-block date ("Agosto 2024", "August 2024")
pub const MONTH_ALTERNATION: &str = r"enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre|january|february|march|april|may|june|july|august|september|october|november|december";

/// Field labels the layout analyzer looks for at the start of a fragment
pub const LAYOUT_LABELS: &[&str] = &[
    "architect",
    "project",
    "owner",
    "scale",
    "date",
    "sheet",
    "arquitecto",
    "proyecto",
    "propietario",
    "escala",
    "fecha",
    "lámina",
    "lamina",
];

/// Document-type vocabulary: (keyword regex, canonical label), most specific first
pub const DOCUMENT_TYPES: &[(&str, &str)] = &[
    (r"detalles?\s+(?:de\s+)?ba[ñn]os?", "Detalle Baños"),
    (r"detalles?\s+(?:de\s+)?puertas?", "Detalle de Puertas"),
    (r"detalles?\s+(?:de\s+)?ventanas?", "Detalle de Ventanas"),
    (r"detalles?\s+(?:de\s+)?closets?", "Detalle de Closets"),
    (r"escantill[oó]n(?:es)?", "Escantillón"),
    (r"cortes?\s+(?:arquitect[oó]nicos?|generales)", "Cortes Arquitectónicos"),
    (r"elevaci[oó]n(?:es)?", "Elevaciones"),
    (r"planta\s+(?:de\s+)?cubiertas?", "Planta de Cubierta"),
    (r"planta\s+(?:de\s+)?fundaciones?", "Planta de Fundaciones"),
    (r"emplazamiento|site\s+plan", "Emplazamiento"),
    (r"plantas?\s+(?:de\s+)?arquitectura|plantas?\s+arquitect[oó]nicas?", "Planta Arquitectónica"),
    (r"\bcortes?\b|\bsections?\b", "Cortes Arquitectónicos"),
    (r"\bplantas?\b|floor\s+plan", "Planta Arquitectónica"),
    (r"\bdetalles?\b|\bdetails?\b", "Detalle Constructivo"),
];

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Any title-block label as a whole word, any case
    static ref LABEL_WORD: Regex =
        Regex::new(&format!(r"(?i)\b(?:{})\b", LABEL_ALTERNATION)).unwrap();

    /// Text that is nothing but one title-block label
    static ref LABEL_ONLY: Regex =
        Regex::new(&format!(r"(?i)^(?:{})$", LABEL_ALTERNATION)).unwrap();

    /// Literal shape a revision date must have
    pub static ref DATE_SHAPE: Regex = Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap();

    /// Revision stages, matched against `fold_key(description)`
    pub static ref PRELIMINARY_STAGE: Regex =
        Regex::new(r"\b(?:ANTEPROYECTO|PRELIMINAR|PRELIMINARY)\b").unwrap();
    pub static ref FINAL_DESIGN_STAGE: Regex =
        Regex::new(r"\b(?:DEFINITIVO|FINAL DESIGN|DISE[NÑ]O FINAL)\b|^FINAL$").unwrap();
    pub static ref MODIFICATION_STAGE: Regex =
        Regex::new(r"\b(?:MODIFICACION|MODIFICATION|MOD)\b").unwrap();
}

/// Collapse runs of whitespace to a single space and trim
pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Replace accented vowels with their plain form. `ñ` is a letter, not an accent, and is kept.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Á' | 'À' | 'Â' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            other => other,
        })
        .collect()
}

/// Comparison key: accents folded, upper-cased, whitespace collapsed
pub fn fold_key(text: &str) -> String {
    clean_text(&fold_accents(text)).to_uppercase()
}

/// Text before the first title-block label word ("Javier Moya Fecha" becomes "Javier Moya")
pub fn truncate_at_label(text: &str) -> &str {
    match LABEL_WORD.find(text) {
        Some(label) => text[..label.start()].trim_end(),
        None => text,
    }
}

/// Whether the whole text is a single title-block label ("FECHA", "Lámina")
pub fn is_label(text: &str) -> bool {
    LABEL_ONLY.is_match(&clean_text(text))
}

/// Whether the text contains any accented vowel
pub fn has_accent(text: &str) -> bool {
    fold_accents(text) != text
}

/// Keep only what can be part of a person's name (letters, spaces, hyphens,
/// apostrophes) and collapse whitespace. Diacritics are preserved.
pub fn normalize_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .map(|c| {
            if c.is_alphabetic() || c == '-' || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect();
    clean_text(&kept)
}

/// Whether a fragment starts with one of the title-block labels (case-insensitive)
pub fn starts_with_layout_label(text: &str) -> bool {
    let lower = text.trim_start().to_lowercase();
    LAYOUT_LABELS.iter().any(|label| lower.starts_with(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(
            clean_text("  PROYECTO:\n  Casa\t hermanos  "),
            "PROYECTO: Casa hermanos"
        );
    }

    #[test]
    fn test_fold_accents_keeps_enye() {
        assert_eq!(fold_accents("Andrés Monseñor Ortíz"), "Andres Monseñor Ortiz");
        assert_eq!(fold_key("Modificación  de proyecto"), "MODIFICACION DE PROYECTO");
        assert!(has_accent("Andrés"));
        assert!(!has_accent("Andres"));
    }

    #[test]
    fn test_normalize_name_strips_punctuation() {
        assert_eq!(
            normalize_name(" Javier  Andrés, Moya Ortiz. "),
            "Javier Andrés Moya Ortiz"
        );
        assert_eq!(normalize_name("Omar Param Abu-ghosh"), "Omar Param Abu-ghosh");
    }

    #[test]
    fn test_stage_keywords() {
        assert!(FINAL_DESIGN_STAGE.is_match(&fold_key("Proyecto Definitivo")));
        assert!(FINAL_DESIGN_STAGE.is_match("FINAL"));
        assert!(!FINAL_DESIGN_STAGE.is_match(&fold_key("Recepción Final")));
        assert!(MODIFICATION_STAGE.is_match(&fold_key("MODIFICACIÓN DE PROYECTO")));
        assert!(MODIFICATION_STAGE.is_match("MOD"));
        assert!(!MODIFICATION_STAGE.is_match("MODELO"));
        assert!(PRELIMINARY_STAGE.is_match("ANTEPROYECTO"));
    }

    #[test]
    fn test_truncate_at_label_any_case() {
        assert_eq!(
            truncate_at_label("Javier Andrés Moya Ortizs Propietario"),
            "Javier Andrés Moya Ortizs"
        );
        assert_eq!(truncate_at_label("Javier Andrés Ortiz fecha"), "Javier Andrés Ortiz");
        assert_eq!(truncate_at_label("Omar Param Lámina"), "Omar Param");
        assert_eq!(truncate_at_label("Omar Param Abu-ghosh"), "Omar Param Abu-ghosh");
        // A label inside a longer word is not a label
        assert_eq!(truncate_at_label("Javier Dateo"), "Javier Dateo");
    }

    #[test]
    fn test_is_label() {
        assert!(is_label("FECHA"));
        assert!(is_label("Lámina"));
        assert!(is_label(" DIRECCION "));
        assert!(!is_label("PROYECTO DEFINITIVO"));
        assert!(!is_label("MODIFICACIÓN"));
    }

    #[test]
    fn test_layout_labels() {
        assert!(starts_with_layout_label("ARQUITECTO: Javier"));
        assert!(starts_with_layout_label("Scale 1:50"));
        assert!(starts_with_layout_label("LÁMINA 9"));
        assert!(!starts_with_layout_label("Casa hermanos"));
    }
}
