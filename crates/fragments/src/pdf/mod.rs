//! PDF documents read directly.
//!
//! A simplified text-rendering state machine walks each page's content
//! stream and emits one fragment per shown string (or per `TJ` array):
//!
//! | Operator | Action |
//! |----------|--------|
//! | `BT`     | Begin text object -- reset matrices |
//! | `Tf`     | Set font and size |
//! | `Tm`     | Set text matrix directly |
//! | `Td`     | Translate text position |
//! | `TD`     | Translate and set leading |
//! | `T*`     | Move to start of next line |
//! | `TL`     | Set text leading |
//! | `Tc`/`Tw`/`Tz`/`Ts` | Spacing, scaling, rise |
//! | `Tj`/`TJ`/`'`/`"` | Show text |
//!
//! PDF user space grows upward, so `top` is measured down from the top edge
//! of the page and the pages are stacked like in `pdftohtml` output. Text
//! set in a bold font is wrapped in `<b>...</b>`.

use std::collections::BTreeMap;

pub mod backend;

use backend::{decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};

use crate::{Fragment, FragmentSource, SourceError};

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfSource;

impl FragmentSource for PdfSource {
    fn fragments(&self, bytes: &[u8]) -> Result<Vec<Fragment>, SourceError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        extract_fragments(&backend)
    }
}

/// Approximate glyph width as a fraction of font size; no glyph metrics are
/// read.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

#[derive(Debug, Clone)]
struct TextState {
    font_size: f32,
    is_bold: bool,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_size: 0.0,
            is_bold: false,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5] + self.text_rise
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Multiply the line matrix by a translation (Td / TD / T*).
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn advance_after_show(&mut self, text: &str) {
        let char_w = self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale;
        let dx: f32 = text
            .chars()
            .map(|ch| {
                let spacing = if ch == ' ' { self.word_spacing } else { 0.0 };
                char_w + self.char_spacing + spacing
            })
            .sum();
        self.advance_x(dx);
    }
}

/// Where the current page sits in the stacked document.
struct PageFrame {
    /// Sum of the heights of all previous pages.
    offset: f32,
    height: f32,
}

impl PageFrame {
    fn fragment(&self, x: f32, y: f32, text: &str, bold: bool) -> Fragment {
        let top = (self.offset + self.height - y).round() as i32;
        let text = if bold {
            format!("<b>{}</b>", text)
        } else {
            text.to_string()
        };
        Fragment::new(top, x.round() as i32, text)
    }
}

/// Extract fragments from every page, pages stacked top to bottom.
pub fn extract_fragments(backend: &dyn PdfBackend) -> Result<Vec<Fragment>, SourceError> {
    let mut fragments = Vec::new();
    let mut offset = 0.0_f32;

    for &page in backend.pages().values() {
        let height = backend.page_height(page)?;
        let frame = PageFrame { offset, height };
        fragments.extend(page_fragments(backend, page, &frame)?);
        offset += height;
    }

    Ok(fragments)
}

fn page_fragments(
    backend: &dyn PdfBackend,
    page: PageId,
    frame: &PageFrame,
) -> Result<Vec<Fragment>, SourceError> {
    let ops = backend.page_operations(page)?;
    let fonts = backend.page_fonts(page).unwrap_or_default();
    Ok(walk_operations(&ops, &fonts, frame))
}

fn walk_operations(
    ops: &[ContentOp],
    fonts: &BTreeMap<Vec<u8>, String>,
    frame: &PageFrame,
) -> Vec<Fragment> {
    let mut state = TextState::default();
    let mut fragments = Vec::new();
    let number = |op: &ContentOp, i: usize| op.operands.get(i).and_then(PdfValue::as_number);

    for op in ops {
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "Tf" => {
                if let (Some(PdfValue::Name(key)), Some(size)) = (op.operands.first(), number(op, 1))
                {
                    let base = fonts
                        .get(key)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(key).into_owned());
                    state.font_size = size;
                    state.is_bold = base.to_uppercase().contains("BOLD");
                }
            }
            "Tm" => {
                let vals: Vec<f32> = op.operands.iter().filter_map(PdfValue::as_number).collect();
                if let &[a, b, c, d, e, f] = vals.as_slice() {
                    state.text_matrix = [a, b, c, d, e, f];
                    state.line_matrix = state.text_matrix;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(op, 0), number(op, 1)) {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(op, 0), number(op, 1)) {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.translate_line(0.0, -state.leading),
            "TL" => {
                if let Some(v) = number(op, 0) {
                    state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = number(op, 0) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number(op, 0) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = number(op, 0) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = number(op, 0) {
                    state.text_rise = v;
                }
            }
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    show_string(bytes, &mut state, frame, &mut fragments);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    show_array(items, &mut state, frame, &mut fragments);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    show_string(bytes, &mut state, frame, &mut fragments);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac), Some(PdfValue::Str(bytes))) =
                    (number(op, 0), number(op, 1), op.operands.get(2))
                {
                    state.word_spacing = aw;
                    state.char_spacing = ac;
                    state.translate_line(0.0, -state.leading);
                    show_string(bytes, &mut state, frame, &mut fragments);
                }
            }
            _ => {}
        }
    }

    fragments
}

fn show_string(
    bytes: &[u8],
    state: &mut TextState,
    frame: &PageFrame,
    fragments: &mut Vec<Fragment>,
) {
    let text = decode_text_simple(bytes);
    if text.trim().is_empty() {
        state.advance_after_show(&text);
        return;
    }
    fragments.push(frame.fragment(state.x(), state.y(), text.trim(), state.is_bold));
    state.advance_after_show(&text);
}

/// A `TJ` array is one fragment: strings are concatenated, large negative
/// kerning adjustments become spaces.
fn show_array(
    items: &[PdfValue],
    state: &mut TextState,
    frame: &PageFrame,
    fragments: &mut Vec<Fragment>,
) {
    let mut buf = String::new();
    let mut start: Option<(f32, f32)> = None;

    for item in items {
        match item {
            PdfValue::Str(bytes) => {
                let text = decode_text_simple(bytes);
                if start.is_none() {
                    start = Some((state.x(), state.y()));
                }
                buf.push_str(&text);
                state.advance_after_show(&text);
            }
            other => {
                if let Some(adj) = other.as_number() {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    let gap = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
                    if dx > gap && !buf.is_empty() {
                        buf.push(' ');
                    }
                    state.advance_x(dx);
                }
            }
        }
    }

    let text = buf.trim();
    if let (Some((x, y)), false) = (start, text.is_empty()) {
        fragments.push(frame.fragment(x, y, text, state.is_bold));
    }
}
