//! Party extraction from reconstructed rows.
//!
//! Two layouts exist:
//!
//! - **Single-year** documents carry one row per state; the overall control
//!   column is the third fragment from the right (Senate and House control
//!   follow it).
//! - **Range** documents carry a header row led by the start year, whose
//!   remaining fragments are the year labels, and one row per state with a
//!   party cell per year.

use serde::Serialize;
use thiserror::Error;

use crate::document::{Document, DocumentMode};
use crate::layout::Row;
use crate::party::{resolve_party_token, resolve_range_cell, PartyValue, UnknownParty};
use crate::table::StateTable;

/// Position of the overall control column, counted from the right.
const SINGLE_YEAR_PARTY_COLUMN: usize = 3;

/// One extracted cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyEntry {
    pub state: String,
    pub year: String,
    pub party: PartyValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("No such party {raw:?} for {state} in document {document}")]
    UnrecognizedParty {
        document: String,
        state: String,
        raw: String,
    },

    #[error("Row for {state} in document {document} has no party column")]
    MissingPartyColumn { document: String, state: String },

    #[error("No year header row starting with {start_year} in document {document}")]
    MissingYearHeader { document: String, start_year: String },
}

impl ExtractError {
    /// Fatal errors mean the source layout assumption no longer holds and
    /// the run must stop. A missing year header only loses one document.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ExtractError::MissingYearHeader { .. })
    }

    fn unrecognized(document: &Document, state: &str, err: UnknownParty) -> Self {
        ExtractError::UnrecognizedParty {
            document: document.identifier.clone(),
            state: state.to_string(),
            raw: err.0,
        }
    }
}

/// Extract every (state, year, party) entry from a document, choosing the
/// strategy from its mode. Rows not led by a state tracked in `states` are
/// skipped.
pub fn extract_document(
    document: &Document,
    states: &StateTable,
) -> Result<Vec<PartyEntry>, ExtractError> {
    match &document.mode {
        DocumentMode::Single { year } => extract_single_year(document, year, states),
        DocumentMode::Range { start_year, .. } => extract_range(document, start_year, states),
    }
}

/// Read the overall control column of every state row.
pub fn extract_single_year(
    document: &Document,
    year: &str,
    states: &StateTable,
) -> Result<Vec<PartyEntry>, ExtractError> {
    let mut entries = Vec::new();

    for row in &document.rows {
        let Some(state) = tracked_state(row, states) else {
            continue;
        };

        let cell = row
            .from_right(SINGLE_YEAR_PARTY_COLUMN)
            .ok_or_else(|| ExtractError::MissingPartyColumn {
                document: document.identifier.clone(),
                state: state.clone(),
            })?;

        let party = resolve_party_token(&cell.text)
            .map_err(|e| ExtractError::unrecognized(document, &state, e))?;

        entries.push(PartyEntry {
            state,
            year: year.to_string(),
            party,
        });
    }

    Ok(entries)
}

/// Find the header row led by `start_year` and return its year labels,
/// leftmost fragment excluded. When several rows qualify the lowest one in
/// the document wins.
pub fn resolve_year_header(rows: &[Row], start_year: &str) -> Option<Vec<String>> {
    rows.iter()
        .rev()
        .find(|row| row.leading_text().as_deref() == Some(start_year))
        .map(|row| row.texts().into_iter().skip(1).collect())
}

/// Read one party cell per declared year from every state row.
///
/// A row shorter than the year list leaves the remaining years unset.
pub fn extract_range(
    document: &Document,
    start_year: &str,
    states: &StateTable,
) -> Result<Vec<PartyEntry>, ExtractError> {
    let years = resolve_year_header(&document.rows, start_year).ok_or_else(|| {
        ExtractError::MissingYearHeader {
            document: document.identifier.clone(),
            start_year: start_year.to_string(),
        }
    })?;

    let mut entries = Vec::new();

    for row in &document.rows {
        let Some(state) = tracked_state(row, states) else {
            continue;
        };

        let cells = row.fragments().iter().skip(1);
        for (year, cell) in years.iter().zip(cells) {
            let party = resolve_range_cell(&cell.text)
                .map_err(|e| ExtractError::unrecognized(document, &state, e))?;
            entries.push(PartyEntry {
                state: state.clone(),
                year: year.clone(),
                party,
            });
        }
    }

    Ok(entries)
}

/// The row's state name, if it is one the table tracks.
fn tracked_state(row: &Row, states: &StateTable) -> Option<String> {
    row.leading_text().filter(|name| states.contains(name))
}
