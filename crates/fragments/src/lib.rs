//! Fragment sources.
//!
//! Adapters that turn a source document into the positioned
//! [`Fragment`] records the core works with. Two formats are supported:
//!
//! - `pdftohtml -xml` output ([`xml::XmlSource`])
//! - PDF files, read directly ([`pdf::PdfSource`])
//!
//! Both stack pages vertically so that the offsets of one document share a
//! single coordinate space.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use legislatures_core::Fragment;

pub mod pdf;
pub mod xml;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("PDF parsing error: {0}")]
    Pdf(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Missing {0} attribute on <text> element")]
    MissingAttribute(&'static str),
    #[error("Invalid {name} attribute: {value:?}")]
    InvalidAttribute { name: &'static str, value: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can turn document bytes into fragments.
pub trait FragmentSource {
    fn fragments(&self, bytes: &[u8]) -> Result<Vec<Fragment>, SourceError>;
}

/// Supported document formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Xml,
    Pdf,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xml" => Some(DocumentFormat::Xml),
            "pdf" => Some(DocumentFormat::Pdf),
            _ => None,
        }
    }

    pub fn source(&self) -> Box<dyn FragmentSource> {
        match self {
            DocumentFormat::Xml => Box::new(xml::XmlSource),
            DocumentFormat::Pdf => Box::new(pdf::PdfSource),
        }
    }
}

/// A document found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub path: PathBuf,
    /// File stem, which drives the document mode.
    pub identifier: String,
    pub format: DocumentFormat,
}

impl DocumentFile {
    /// Describe `path` if it has a supported extension and a UTF-8 stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        let identifier = path.file_stem()?.to_str()?.to_string();
        Some(Self {
            path,
            identifier,
            format,
        })
    }

    /// Read the file and extract its fragments.
    pub fn read_fragments(&self) -> Result<Vec<Fragment>, SourceError> {
        let bytes = std::fs::read(&self.path)?;
        self.format.source().fragments(&bytes)
    }
}

/// Every entry of `dir`, split into supported documents (sorted by file
/// name) and skipped paths.
pub fn list_documents(dir: &Path) -> Result<(Vec<DocumentFile>, Vec<PathBuf>), SourceError> {
    let mut documents = Vec::new();
    let mut skipped = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match DocumentFile::from_path(&path) {
            Some(doc) => documents.push(doc),
            None => skipped.push(path),
        }
    }

    documents.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    skipped.sort();
    Ok((documents, skipped))
}
