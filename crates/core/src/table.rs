//! The state/year table every document writes into.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::extract::PartyEntry;
use crate::party::PartyValue;
use crate::states::STATE_NAMES;

/// Label of the first export column.
pub const STATE_COLUMN: &str = "State";

/// Reduce a raw year key to its export label by dropping any trailing
/// qualifier: `"2008 Leg."` becomes `"2008"`.
pub fn year_label(raw: &str) -> &str {
    raw.split_whitespace().next().unwrap_or("")
}

/// One state's known history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateRecord {
    name: String,
    data: BTreeMap<String, PartyValue>,
}

impl StateRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Party per raw year key, in ascending key order.
    pub fn data(&self) -> &BTreeMap<String, PartyValue> {
        &self.data
    }

    pub fn get(&self, year: &str) -> Option<PartyValue> {
        self.data.get(year).copied()
    }

    /// Store a value, returning the one it replaced.
    pub fn set(&mut self, year: impl Into<String>, party: PartyValue) -> Option<PartyValue> {
        self.data.insert(year.into(), party)
    }

    /// `State` followed by this record's year labels in ascending order.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(STATE_COLUMN.to_string())
            .chain(self.data.keys().map(|k| year_label(k).to_string()))
            .collect()
    }

    /// The state name followed by its party values, aligned with
    /// [`StateRecord::header`].
    pub fn row(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.data.values().map(|p| p.to_string()))
            .collect()
    }
}

/// Header plus rows, the shape written to and read from CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportGrid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// All tracked states, pre-populated from a reference list.
///
/// Names outside the list are ignored on write; the list is authoritative.
#[derive(Debug, Clone)]
pub struct StateTable {
    records: Vec<StateRecord>,
    index: HashMap<String, usize>,
}

impl Default for StateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTable {
    /// A table tracking [`STATE_NAMES`].
    pub fn new() -> Self {
        Self::with_states(STATE_NAMES)
    }

    /// A table tracking the given names, in the given order. Duplicate names
    /// are tracked once.
    pub fn with_states<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut records = Vec::new();
        let mut index = HashMap::new();
        for name in names {
            let name = name.into();
            if index.contains_key(&name) {
                continue;
            }
            index.insert(name.clone(), records.len());
            records.push(StateRecord::new(name));
        }
        Self { records, index }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&StateRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Records in reference-list order.
    pub fn records(&self) -> &[StateRecord] {
        &self.records
    }

    /// Write one entry, overwriting any earlier value for the same state and
    /// year. Returns `false` when the state is not tracked.
    pub fn record(&mut self, entry: &PartyEntry) -> bool {
        match self.index.get(&entry.state) {
            Some(&i) => {
                self.records[i].set(entry.year.clone(), entry.party);
                true
            }
            None => false,
        }
    }

    /// Write every entry in order and return how many were stored.
    pub fn extend<'a, I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = &'a PartyEntry>,
    {
        entries.into_iter().filter(|e| self.record(e)).count()
    }

    /// Every year label any state has a value for, ascending.
    pub fn year_labels(&self) -> Vec<String> {
        let labels: BTreeSet<&str> = self
            .records
            .iter()
            .flat_map(|r| r.data.keys().map(|k| year_label(k)))
            .collect();
        labels.into_iter().map(str::to_string).collect()
    }

    /// Build the export grid: `State` plus the ascending union of year
    /// labels, then one row per state with empty cells for unknown years.
    pub fn grid(&self) -> ExportGrid {
        let labels = self.year_labels();

        let header = std::iter::once(STATE_COLUMN.to_string())
            .chain(labels.iter().cloned())
            .collect();

        let rows = self
            .records
            .iter()
            .map(|record| {
                // Raw keys iterate ascending, so the later key wins when two
                // reduce to the same label.
                let by_label: HashMap<&str, PartyValue> = record
                    .data
                    .iter()
                    .map(|(k, p)| (year_label(k), *p))
                    .collect();
                std::iter::once(record.name.clone())
                    .chain(labels.iter().map(|label| {
                        by_label
                            .get(label.as_str())
                            .map(PartyValue::to_string)
                            .unwrap_or_default()
                    }))
                    .collect()
            })
            .collect();

        ExportGrid { header, rows }
    }
}
