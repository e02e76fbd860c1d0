//! Core library for legislatures
//!
//! This crate implements the **Functional Core** of the legislatures tool,
//! following the Functional Core - Imperative Shell pattern used across the
//! workspace:
//!
//! - **`legislatures_core`** (this crate): pure layout reconstruction and
//!   extraction with zero I/O
//! - **`fragments`**: turns source documents into positioned [`Fragment`]s
//! - **`legislatures`**: directory walking, CSV, logging and the CLI
//!
//! # Pipeline
//!
//! ```text
//! Fragment[] -> layout::cluster -> Row[] -> extract::extract_document -> PartyEntry[]
//!                                                                            |
//!                        tally::tally <- ExportGrid <- table::StateTable <---+
//! ```
//!
//! Each document is clustered and extracted on its own; the [`StateTable`]
//! is the only state shared across documents and keeps the last value
//! written for a state and year.
//!
//! # Example Usage
//!
//! ```rust
//! use legislatures_core::{extract_document, Document, Fragment, PartyValue, StateTable};
//!
//! let fragments = vec![
//!     Fragment::new(100, 0, "Texas"),
//!     Fragment::new(100, 40, "31"),
//!     Fragment::new(101, 80, "150"),
//!     Fragment::new(99, 120, "Rep*"),
//!     Fragment::new(100, 160, "Rep"),
//!     Fragment::new(100, 200, "Rep"),
//! ];
//! let document = Document::from_fragments("2012", fragments);
//!
//! let mut table = StateTable::new();
//! let entries = extract_document(&document, &table).unwrap();
//! table.extend(&entries);
//!
//! assert_eq!(table.get("Texas").unwrap().get("2012"), Some(PartyValue::Rep));
//! ```

pub mod document;
pub mod extract;
pub mod fragment;
pub mod layout;
pub mod party;
pub mod states;
pub mod table;
pub mod tally;

pub use document::{Document, DocumentMode};
pub use extract::{extract_document, ExtractError, PartyEntry};
pub use fragment::Fragment;
pub use layout::{cluster, LineClusterer, Row};
pub use party::{resolve_party_token, PartyValue, UnknownParty};
pub use table::{ExportGrid, StateRecord, StateTable};
pub use tally::{tally, PartyCounts, YearTally};
