use std::collections::BTreeMap;

use lopdf::content::Content;

use crate::SourceError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

/// A lopdf-independent content-stream operand.
///
/// Only the shapes the text walk reads are distinguished; everything else
/// collapses into `Other`.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value of an `Integer` or `Real` operand.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(f) => Some(*f),
            _ => None,
        }
    }
}

/// A single content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: &str, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.to_string(),
            operands,
        }
    }
}

fn convert_object(obj: &lopdf::Object) -> PdfValue {
    match obj {
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Best-effort decoding of raw PDF string bytes.
///
/// UTF-16BE with a BOM first, then UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, payload @ ..] = bytes {
        let code_units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&code_units);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// The page-level queries the text walk needs.
///
/// Implemented by [`LopdfBackend`]; tests drive the walk with canned
/// operations instead.
pub trait PdfBackend {
    /// 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Page height from the MediaBox, in points.
    fn page_height(&self, page: PageId) -> Result<f32, SourceError>;

    /// Resource key to base font name for every font on the page.
    fn page_fonts(&self, page: PageId) -> Result<BTreeMap<Vec<u8>, String>, SourceError>;

    /// The page's decoded content-stream operations.
    fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>, SourceError>;
}

/// [`PdfBackend`] backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    pub fn load_bytes(data: &[u8]) -> Result<Self, SourceError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| SourceError::Pdf(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(SourceError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Walk up the page tree to find the MediaBox array.
    fn find_media_box(&self, dict: &lopdf::Dictionary) -> Option<Vec<lopdf::Object>> {
        if let Ok(obj) = dict.get(b"MediaBox") {
            let resolved = match obj {
                lopdf::Object::Reference(id) => self.doc.get_object(*id).ok()?,
                other => other,
            };
            if let Ok(arr) = resolved.as_array() {
                return Some(arr.clone());
            }
        }

        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = self.doc.get_object(parent_id).ok()?.as_dict().ok()?;
        self.find_media_box(parent)
    }

    fn number(&self, obj: &lopdf::Object) -> Option<f32> {
        let resolved = match obj {
            lopdf::Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        convert_object(resolved).as_number()
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_height(&self, page: PageId) -> Result<f32, SourceError> {
        let page_dict = self
            .doc
            .get_object(page)
            .and_then(|obj| obj.as_dict())
            .map_err(|e| SourceError::Pdf(format!("cannot get page dictionary: {}", e)))?;

        let media_box = self
            .find_media_box(page_dict)
            .ok_or_else(|| SourceError::Pdf("MediaBox not found for page".into()))?;

        let nums: Vec<f32> = media_box.iter().filter_map(|o| self.number(o)).collect();
        match nums.as_slice() {
            [_, lly, _, ury, ..] => Ok(ury - lly),
            _ => Err(SourceError::Pdf(format!(
                "MediaBox has {} numeric elements, expected 4",
                nums.len()
            ))),
        }
    }

    fn page_fonts(&self, page: PageId) -> Result<BTreeMap<Vec<u8>, String>, SourceError> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| SourceError::Pdf(format!("cannot get page fonts: {}", e)))?;

        Ok(fonts
            .into_iter()
            .map(|(key, dict)| {
                let base_font = dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .unwrap_or_default();
                (key, base_font)
            })
            .collect())
    }

    fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>, SourceError> {
        let raw = self
            .doc
            .get_page_content(page)
            .map_err(|e| SourceError::Pdf(format!("cannot get page content: {}", e)))?;

        let content = Content::decode(&raw)
            .map_err(|e| SourceError::Pdf(format!("content stream decode error: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_text_simple_utf8() {
        assert_eq!(decode_text_simple("Texas".as_bytes()), "Texas");
    }

    #[test]
    fn decode_text_simple_latin1() {
        // 0xE9 is U+00E9 in Latin-1 but not valid standalone UTF-8.
        let input: &[u8] = &[0x63, 0x61, 0x66, 0xE9];
        assert_eq!(decode_text_simple(input), "caf\u{00E9}");
    }

    #[test]
    fn decode_text_simple_utf16be() {
        let input: &[u8] = &[0xFE, 0xFF, 0x00, 0x52, 0x00, 0x65, 0x00, 0x70];
        assert_eq!(decode_text_simple(input), "Rep");
    }

    #[test]
    fn decode_text_simple_utf16be_odd_trailing_byte() {
        let input: &[u8] = &[0xFE, 0xFF, 0x00, 0x41, 0x00];
        assert_eq!(decode_text_simple(input), "A");
    }

    #[test]
    fn as_number_accepts_integer_and_real() {
        assert_eq!(PdfValue::Integer(42).as_number(), Some(42.0));
        assert_eq!(PdfValue::Real(1.5).as_number(), Some(1.5));
        assert_eq!(PdfValue::Name(b"F1".to_vec()).as_number(), None);
    }

    #[test]
    fn convert_object_keeps_text_operands() {
        let obj = lopdf::Object::Array(vec![
            lopdf::Object::string_literal("Ohio"),
            lopdf::Object::Integer(-250),
            lopdf::Object::Null,
        ]);
        assert_eq!(
            convert_object(&obj),
            PdfValue::Array(vec![
                PdfValue::Str(b"Ohio".to_vec()),
                PdfValue::Integer(-250),
                PdfValue::Other,
            ])
        );
    }

    #[test]
    fn load_bytes_rejects_garbage() {
        assert!(matches!(
            LopdfBackend::load_bytes(b"not a pdf"),
            Err(SourceError::Pdf(_))
        ));
    }
}
