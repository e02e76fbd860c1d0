//! CSV storage of the export grid.

use std::io;
use std::path::Path;

use legislatures_core::ExportGrid;

use crate::prelude::*;

/// Write the grid to `path`, creating parent directories as needed.
pub fn write_grid(path: &Path, grid: &ExportGrid) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| f!("Failed to create directory {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .wrap_err_with(|| f!("Failed to create {}", path.display()))?;
    write_grid_to(file, grid)
}

pub fn write_grid_to<W: io::Write>(writer: W, grid: &ExportGrid) -> Result<()> {
    // Rows are ragged only if a caller built the grid by hand.
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    writer.write_record(&grid.header)?;
    for row in &grid.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a grid back. The first record is the header.
pub fn read_grid(path: &Path) -> Result<ExportGrid> {
    let file =
        std::fs::File::open(path).wrap_err_with(|| f!("Failed to open {}", path.display()))?;
    read_grid_from(file)?.ok_or_else(|| Error::EmptyCsv(path.to_path_buf()).into())
}

/// `None` when the input has no records at all.
pub fn read_grid_from<R: io::Read>(reader: R) -> Result<Option<ExportGrid>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = reader.records();
    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => return Ok(None),
    };

    let rows = records
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

    Ok(Some(ExportGrid { header, rows }))
}
