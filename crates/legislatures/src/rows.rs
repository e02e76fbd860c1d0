use std::path::PathBuf;

use fragments::DocumentFile;
use legislatures_core::{Document, DocumentMode};

use crate::prelude::{println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "rows")]
#[command(about = "Print the reconstructed rows of a single document")]
pub struct App {
    /// Path to the document (.xml or .pdf)
    path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let document = load_document(&app.path)?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    if global.verbose {
        match &document.mode {
            DocumentMode::Single { year } => println!("Single-year document for {}", year),
            DocumentMode::Range { start_year, .. } => {
                println!("Multi-year document starting in {}", start_year)
            }
        }
        println!("{} row(s):\n", document.rows.len());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Band", "Fragments"]);
    for row in &document.rows {
        table.add_row(prettytable::row![row.band, row.texts().join(" | ")]);
    }
    table.printstd();

    Ok(())
}

pub fn load_document(path: &std::path::Path) -> Result<Document> {
    let file = DocumentFile::from_path(path)
        .ok_or_else(|| Error::UnsupportedDocument(path.to_path_buf()))?;
    let fragments = file.read_fragments().map_err(|source| Error::Fragments {
        path: file.path.clone(),
        source,
    })?;
    Ok(Document::from_fragments(file.identifier, fragments))
}
