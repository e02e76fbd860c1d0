use std::path::{Path, PathBuf};

use fragments::list_documents;
use legislatures_core::{extract_document, Document, DocumentMode, StateTable};

use crate::prelude::{println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "build")]
#[command(about = "Build the state/year CSV from a directory of documents")]
pub struct App {
    /// Directory holding the source documents (.xml or .pdf)
    #[arg(short, long, env = "LEGISLATURES_INPUT", default_value = "xml")]
    input: PathBuf,

    /// Where to write the CSV
    #[arg(
        short,
        long,
        env = "LEGISLATURES_OUTPUT",
        default_value = "data/state_legislatures.csv"
    )]
    output: PathBuf,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let table = build_table(&app.input)?;
    let grid = table.grid();
    crate::grid::write_grid(&app.output, &grid)?;

    if global.verbose {
        println!(
            "Wrote {} states x {} years to {}",
            grid.rows.len(),
            grid.header.len().saturating_sub(1),
            app.output.display()
        );
    }

    Ok(())
}

/// Read every document under `dir`, in file name order, into a fresh table.
pub fn build_table(dir: &Path) -> Result<StateTable> {
    let (documents, skipped) = list_documents(dir).map_err(|source| Error::Fragments {
        path: dir.to_path_buf(),
        source,
    })?;

    for path in &skipped {
        log::warn!("skipping unsupported file {}", path.display());
    }

    if documents.is_empty() {
        return Err(Error::NoDocuments(dir.to_path_buf()).into());
    }

    let mut table = StateTable::new();
    for file in &documents {
        let fragments = file.read_fragments().map_err(|source| Error::Fragments {
            path: file.path.clone(),
            source,
        })?;
        let document = Document::from_fragments(file.identifier.as_str(), fragments);
        process_document(&document, &mut table)?;
    }

    Ok(table)
}

/// Extract one document into `table`, returning the number of cells
/// written. Documents without a year header are logged and skipped.
pub fn process_document(document: &Document, table: &mut StateTable) -> Result<usize> {
    match &document.mode {
        DocumentMode::Single { year } => log::info!("parsing year {}", year),
        DocumentMode::Range { .. } => log::info!("parsing years {}", document.identifier),
    }
    log::debug!(
        "{} rows reconstructed from {}",
        document.rows.len(),
        document.identifier
    );

    match extract_document(document, table) {
        Ok(entries) => Ok(table.extend(&entries)),
        Err(err) if !err.is_fatal() => {
            log::warn!("{}", err);
            Ok(0)
        }
        Err(err) => Err(Error::from(err).into()),
    }
}
