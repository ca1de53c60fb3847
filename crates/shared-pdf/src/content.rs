//! Positioned text from a page content stream
//!
//! Walks the operators of one page and keeps just enough of the graphics and
//! text state to know where each string is drawn: the CTM (`cm`, `q`, `Q`),
//! the text and line matrices (`BT`, `Tm`, `Td`, `TD`, `T*`, `TL`) and the
//! current font (`Tf`). No font metrics are read, so widths are estimates.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use shared_types::TextFragment;

/// Average glyph advance as a fraction of the font size
const GLYPH_WIDTH_RATIO: f64 = 0.5;

/// TJ adjustments below this (thousandths of an em) read as a word gap
const TJ_SPACE_THRESHOLD: i64 = -100;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f64; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        let values = numbers(operands)?;
        let m: [f64; 6] = values.get(..6)?.try_into().ok()?;
        Some(Matrix(m))
    }

    /// `self × other`
    fn then(self, other: Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [oa, ob, oc, od, oe, of] = other.0;
        Matrix([
            a * oa + b * oc,
            a * ob + b * od,
            c * oa + d * oc,
            c * ob + d * od,
            e * oa + f * oc + oe,
            e * ob + f * od + of,
        ])
    }

    fn translate(self, tx: f64, ty: f64) -> Matrix {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty]).then(self)
    }

    fn origin(&self) -> (f64, f64) {
        (self.0[4], self.0[5])
    }

    fn vertical_scale(&self) -> f64 {
        (self.0[1] * self.0[1] + self.0[3] * self.0[3]).sqrt()
    }
}

struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    text: Matrix,
    line: Matrix,
    font_name: String,
    font_size: f64,
    leading: f64,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            text: Matrix::IDENTITY,
            line: Matrix::IDENTITY,
            font_name: String::new(),
            font_size: 0.0,
            leading: 0.0,
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line = self.line.translate(tx, ty);
        self.text = self.line;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Fragment for `text` at the current position; advances the text matrix past it
    fn show(&mut self, text: String, page: u32) -> Option<TextFragment> {
        let glyphs = text.chars().count() as f64;
        let advance = glyphs * self.font_size * GLYPH_WIDTH_RATIO;

        let rendering = self.text.then(self.ctm);
        let (x, y) = rendering.origin();
        let scale = rendering.vertical_scale();
        self.text = self.text.translate(advance, 0.0);

        if text.trim().is_empty() {
            return None;
        }

        Some(TextFragment {
            width: advance * scale,
            height: self.font_size * scale,
            font_size: self.font_size * scale,
            font_name: self.font_name.clone(),
            text: text.trim().to_string(),
            x,
            y,
            page,
        })
    }
}

/// Every text-showing operator on the page, in content-stream order
pub fn page_fragments(doc: &Document, page_id: ObjectId, page_number: u32) -> Vec<TextFragment> {
    let Ok(raw) = doc.get_page_content(page_id) else {
        return Vec::new();
    };
    let Ok(content) = Content::decode(&raw) else {
        return Vec::new();
    };

    let mut state = TextState::new();
    let mut fragments = Vec::new();

    for op in &content.operations {
        let operands = op.operands.as_slice();
        let shown = match op.operator.as_str() {
            "q" => {
                state.saved.push(state.ctm);
                None
            }
            "Q" => {
                state.ctm = state.saved.pop().unwrap_or(Matrix::IDENTITY);
                None
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.ctm = m.then(state.ctm);
                }
                None
            }
            "BT" => {
                state.text = Matrix::IDENTITY;
                state.line = Matrix::IDENTITY;
                None
            }
            "Tf" => {
                if let Some(name) = operands.first().and_then(|o| o.as_name().ok()) {
                    state.font_name = String::from_utf8_lossy(name).into_owned();
                }
                if let Some(size) = operands.get(1).and_then(number) {
                    state.font_size = size;
                }
                None
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    state.leading = leading;
                }
                None
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.text = m;
                    state.line = m;
                }
                None
            }
            "Td" | "TD" => {
                if let Some(&[tx, ty]) = numbers(operands).as_deref() {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
                None
            }
            "T*" => {
                state.next_line();
                None
            }
            "Tj" | "TJ" => operands.first().and_then(decode_text_operand),
            "'" => {
                state.next_line();
                operands.first().and_then(decode_text_operand)
            }
            "\"" => {
                state.next_line();
                operands.get(2).and_then(decode_text_operand)
            }
            _ => None,
        };

        if let Some(text) = shown {
            fragments.extend(state.show(text, page_number));
        }
    }

    fragments
}

fn number(object: &Object) -> Option<f64> {
    object.as_float().ok().map(f64::from)
}

fn numbers(operands: &[Object]) -> Option<Vec<f64>> {
    operands.iter().map(number).collect()
}

/// Decode a string operand: UTF-8, then UTF-16BE with BOM, then Latin-1.
/// TJ arrays are flattened, large negative adjustments become spaces.
pub fn decode_text_operand(operand: &Object) -> Option<String> {
    match operand {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Array(items) => {
            let mut text = String::new();
            for item in items {
                match item {
                    Object::String(bytes, _) => text.push_str(&decode_pdf_string(bytes)),
                    Object::Integer(n) if *n < TJ_SPACE_THRESHOLD => text.push(' '),
                    Object::Real(n) if (*n as i64) < TJ_SPACE_THRESHOLD => text.push(' '),
                    _ => {}
                }
            }
            Some(text)
        }
        _ => None,
    }
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        if let Ok(s) = String::from_utf16(&units) {
            return s;
        }
    }
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    fn literal(text: &str) -> Object {
        Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "Lámina" in WinAnsi/Latin-1
        let bytes = vec![0x4C, 0xE1, 0x6D, 0x69, 0x6E, 0x61];
        assert_eq!(decode_pdf_string(&bytes), "Lámina");
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "Baño".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_pdf_string(&bytes), "Baño");
    }

    #[test]
    fn test_tj_array_spacing() {
        let array = Object::Array(vec![
            literal("ESC"),
            Object::Integer(-250),
            literal("1:50"),
            Object::Integer(-20),
            literal("0"),
        ]);
        assert_eq!(decode_text_operand(&array).as_deref(), Some("ESC 1:500"));
        assert_eq!(decode_text_operand(&Object::Integer(3)), None);
    }

    #[test]
    fn test_matrix_translate_and_concat() {
        let scaled = Matrix([2.0, 0.0, 0.0, 2.0, 10.0, 20.0]);
        assert_eq!(scaled.translate(5.0, 1.0).origin(), (20.0, 22.0));

        let shifted = Matrix([1.0, 0.0, 0.0, 1.0, 100.0, 50.0]);
        assert_eq!(Matrix::IDENTITY.translate(3.0, 4.0).then(shifted).origin(), (103.0, 54.0));
        assert_eq!(scaled.vertical_scale(), 2.0);
    }
}
