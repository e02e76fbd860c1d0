//! `pdftohtml -xml` documents.
//!
//! ```xml
//! <pdf2xml>
//! <page number="1" position="absolute" top="0" left="0" height="1188" width="918">
//! <text top="212" left="108" width="44" height="12" font="1"><b>Alabama</b></text>
//! </page>
//! </pdf2xml>
//! ```
//!
//! Every `<text>` element becomes one fragment. Elements nested inside it
//! (`<b>`, `<i>`, ...) are kept as literal markup in the fragment text.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Fragment, FragmentSource, SourceError};

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSource;

impl FragmentSource for XmlSource {
    fn fragments(&self, bytes: &[u8]) -> Result<Vec<Fragment>, SourceError> {
        let content = String::from_utf8_lossy(bytes);
        parse_fragments(&content)
    }
}

/// A `<text>` element whose closing tag has not been seen yet.
struct OpenText {
    top: i32,
    left: i32,
    text: String,
}

/// Parse every `<text>` element in document order.
///
/// A fragment's `top` is its page-local `top` plus the heights of all the
/// pages before it.
pub fn parse_fragments(content: &str) -> Result<Vec<Fragment>, SourceError> {
    let mut reader = Reader::from_str(content);

    let mut fragments = Vec::new();
    let mut page_offset: i32 = 0;
    let mut page_height: i32 = 0;
    let mut open: Option<OpenText> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => {
                    page_offset = page_offset.saturating_add(page_height);
                    page_height = optional_offset(&e, "height")?.unwrap_or(0);
                }
                b"text" => open = Some(open_text(&e, page_offset)?),
                name => {
                    if let Some(text) = open.as_mut() {
                        text.text.push('<');
                        text.text.push_str(&String::from_utf8_lossy(name));
                        text.text.push('>');
                    }
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"page" => {
                    page_offset = page_offset.saturating_add(page_height);
                    page_height = optional_offset(&e, "height")?.unwrap_or(0);
                }
                b"text" => {
                    let text = open_text(&e, page_offset)?;
                    fragments.push(Fragment::new(text.top, text.left, text.text));
                }
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"text" => {
                    if let Some(text) = open.take() {
                        fragments.push(Fragment::new(text.top, text.left, text.text));
                    }
                }
                b"page" => {}
                name => {
                    if let Some(text) = open.as_mut() {
                        text.text.push_str("</");
                        text.text.push_str(&String::from_utf8_lossy(name));
                        text.text.push('>');
                    }
                }
            },
            Event::Text(e) => {
                if let Some(text) = open.as_mut() {
                    text.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(text) = open.as_mut() {
                    text.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fragments)
}

fn open_text(e: &BytesStart<'_>, page_offset: i32) -> Result<OpenText, SourceError> {
    let top = optional_offset(e, "top")?.ok_or(SourceError::MissingAttribute("top"))?;
    let left = optional_offset(e, "left")?.ok_or(SourceError::MissingAttribute("left"))?;
    Ok(OpenText {
        top: page_offset.saturating_add(top),
        left,
        text: String::new(),
    })
}

/// Read a numeric attribute. Fractional values are rounded.
fn optional_offset(e: &BytesStart<'_>, name: &'static str) -> Result<Option<i32>, SourceError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        if attr.key.as_ref() != name.as_bytes() {
            continue;
        }
        let value = String::from_utf8_lossy(&attr.value).trim().to_string();
        return parse_offset(&value)
            .map(Some)
            .ok_or(SourceError::InvalidAttribute { name, value });
    }
    Ok(None)
}

fn parse_offset(value: &str) -> Option<i32> {
    if let Ok(v) = value.parse::<i32>() {
        return Some(v);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i32)
}
