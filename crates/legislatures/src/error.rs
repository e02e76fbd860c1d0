use std::path::PathBuf;

use fragments::SourceError;
use legislatures_core::ExtractError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to read fragments from {path}: {source}")]
    Fragments {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("No supported documents in {0}")]
    NoDocuments(PathBuf),

    #[error("Unsupported document {0} (expected .xml or .pdf)")]
    UnsupportedDocument(PathBuf),

    #[error("CSV file {0} has no header row")]
    EmptyCsv(PathBuf),
}
