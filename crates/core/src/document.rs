use serde::Serialize;

use crate::fragment::Fragment;
use crate::layout::{cluster, Row};

/// Separates the start year from the suffix in a multi-year identifier.
pub const RANGE_SEPARATOR: char = '_';

/// How a document lays out its party data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DocumentMode {
    /// One year per document, the identifier is the year label.
    Single { year: String },
    /// Several years per document, declared by a header row led by
    /// `start_year`.
    Range { start_year: String, suffix: String },
}

impl DocumentMode {
    /// Classify a document by its identifier (the file stem).
    ///
    /// ```
    /// use legislatures_core::document::DocumentMode;
    ///
    /// assert!(matches!(DocumentMode::classify("2008"), DocumentMode::Single { .. }));
    /// assert!(matches!(DocumentMode::classify("2009_2014"), DocumentMode::Range { .. }));
    /// ```
    pub fn classify(identifier: &str) -> Self {
        match identifier.split_once(RANGE_SEPARATOR) {
            Some((start, suffix)) => DocumentMode::Range {
                start_year: start.to_string(),
                suffix: suffix.to_string(),
            },
            None => DocumentMode::Single {
                year: identifier.to_string(),
            },
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, DocumentMode::Range { .. })
    }
}

/// One source document after line reconstruction.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub identifier: String,
    pub mode: DocumentMode,
    pub rows: Vec<Row>,
}

impl Document {
    /// Classify the identifier and cluster the fragments into ordered rows.
    pub fn from_fragments<I>(identifier: impl Into<String>, fragments: I) -> Self
    where
        I: IntoIterator<Item = Fragment>,
    {
        let identifier = identifier.into();
        let mode = DocumentMode::classify(&identifier);
        let rows = cluster(fragments);
        Self {
            identifier,
            mode,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_single_year() {
        assert_eq!(
            DocumentMode::classify("2008"),
            DocumentMode::Single {
                year: "2008".to_string()
            }
        );
    }

    #[test]
    fn test_classify_range() {
        assert_eq!(
            DocumentMode::classify("2009_2014"),
            DocumentMode::Range {
                start_year: "2009".to_string(),
                suffix: "2014".to_string()
            }
        );
    }

    #[test]
    fn test_classify_range_splits_on_first_separator() {
        assert_eq!(
            DocumentMode::classify("1990_to_1999"),
            DocumentMode::Range {
                start_year: "1990".to_string(),
                suffix: "to_1999".to_string()
            }
        );
    }

    #[test]
    fn test_is_range() {
        assert!(DocumentMode::classify("2001_x").is_range());
        assert!(!DocumentMode::classify("2001").is_range());
    }

    #[test]
    fn test_document_from_fragments() {
        let doc = Document::from_fragments(
            "2010",
            vec![
                Fragment::new(20, 50, "Rep"),
                Fragment::new(21, 0, "Ohio"),
                Fragment::new(10, 0, "State"),
            ],
        );
        assert_eq!(doc.identifier, "2010");
        assert!(!doc.mode.is_range());
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.rows[1].texts(), vec!["Ohio", "Rep"]);
    }
}
