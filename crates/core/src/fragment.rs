use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Inline emphasis tags (`<b>`, `</b>`, `<i>`, ...) left in the text by the
/// document converter.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Footnote markers attached to cell values.
const FOOTNOTE_MARKERS: &[char] = &['*', '\u{2020}', '\u{2021}'];

/// A single run of text at a specific position on the page.
///
/// Offsets are integers measured from the top-left corner of the document:
/// `top` grows downward, `left` grows rightward. `text` is raw and may still
/// carry footnote markers or emphasis markup; use [`Fragment::plain_text`] to
/// compare it against names and labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub top: i32,
    pub left: i32,
    pub text: String,
}

impl Fragment {
    pub fn new(top: i32, left: i32, text: impl Into<String>) -> Self {
        Self {
            top,
            left,
            text: text.into(),
        }
    }

    /// The fragment text without markup, footnote markers or surrounding
    /// whitespace.
    pub fn plain_text(&self) -> String {
        plain_text(&self.text)
    }
}

/// Strip emphasis markup and footnote markers, then trim.
///
/// ```
/// use legislatures_core::fragment::plain_text;
///
/// assert_eq!(plain_text(" <b>Rep*</b> "), "Rep");
/// ```
pub fn plain_text(raw: &str) -> String {
    let stripped = MARKUP.replace_all(raw, "");
    stripped
        .chars()
        .filter(|c| !FOOTNOTE_MARKERS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
