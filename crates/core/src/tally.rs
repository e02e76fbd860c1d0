//! Per-year party counts, overall and for the southern states.

use serde::Serialize;

use crate::party::PartyValue;
use crate::states::is_southern;
use crate::table::ExportGrid;

/// Number of legislatures under each kind of control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartyCounts {
    pub rep: usize,
    pub dem: usize,
    pub split: usize,
}

impl PartyCounts {
    pub fn add(&mut self, party: PartyValue) {
        match party {
            PartyValue::Rep => self.rep += 1,
            PartyValue::Dem => self.dem += 1,
            PartyValue::Split => self.split += 1,
        }
    }

    pub fn get(&self, party: PartyValue) -> usize {
        match party {
            PartyValue::Rep => self.rep,
            PartyValue::Dem => self.dem,
            PartyValue::Split => self.split,
        }
    }

    pub fn total(&self) -> usize {
        self.rep + self.dem + self.split
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTally {
    pub year: String,
    pub overall: PartyCounts,
    pub southern: PartyCounts,
}

/// Count every year column of an export grid.
///
/// Columns keep header order. Empty cells and anything that is not a
/// canonical party value are skipped.
pub fn tally(grid: &ExportGrid) -> Vec<YearTally> {
    let mut tallies: Vec<YearTally> = grid
        .header
        .iter()
        .skip(1)
        .map(|year| YearTally {
            year: year.clone(),
            overall: PartyCounts::default(),
            southern: PartyCounts::default(),
        })
        .collect();

    for row in &grid.rows {
        let Some((state, cells)) = row.split_first() else {
            continue;
        };
        let southern = is_southern(state);
        for (entry, cell) in tallies.iter_mut().zip(cells) {
            let Ok(party) = cell.parse::<PartyValue>() else {
                continue;
            };
            entry.overall.add(party);
            if southern {
                entry.southern.add(party);
            }
        }
    }

    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::StateTable;
    use crate::extract::PartyEntry;

    fn grid(header: &[&str], rows: &[&[&str]]) -> ExportGrid {
        ExportGrid {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_tally_counts_overall_and_southern() {
        let g = grid(
            &["State", "2008", "2009"],
            &[
                &["Texas", "Rep", "Rep"],
                &["Ohio", "Dem", "Split"],
                &["Georgia", "Dem", "Rep"],
            ],
        );
        let tallies = tally(&g);
        assert_eq!(tallies.len(), 2);

        assert_eq!(tallies[0].year, "2008");
        assert_eq!(
            tallies[0].overall,
            PartyCounts {
                rep: 1,
                dem: 2,
                split: 0
            }
        );
        assert_eq!(
            tallies[0].southern,
            PartyCounts {
                rep: 1,
                dem: 1,
                split: 0
            }
        );

        assert_eq!(tallies[1].overall.get(PartyValue::Rep), 2);
        assert_eq!(tallies[1].overall.get(PartyValue::Split), 1);
        assert_eq!(tallies[1].southern.total(), 2);
    }

    #[test]
    fn test_tally_skips_empty_and_unrecognized_cells() {
        let g = grid(
            &["State", "2008"],
            &[&["Texas", ""], &["Ohio", "Whig"], &["Iowa", "Dem"]],
        );
        let tallies = tally(&g);
        assert_eq!(tallies[0].overall.total(), 1);
        assert_eq!(tallies[0].southern.total(), 0);
    }

    #[test]
    fn test_tally_handles_short_rows() {
        let g = grid(&["State", "2008", "2009"], &[&["Ohio", "Rep"], &[]]);
        let tallies = tally(&g);
        assert_eq!(tallies[0].overall.rep, 1);
        assert_eq!(tallies[1].overall.total(), 0);
    }

    #[test]
    fn test_tally_header_only() {
        let g = grid(&["State"], &[&["Ohio"]]);
        assert!(tally(&g).is_empty());
    }

    #[test]
    fn test_tally_from_state_table() {
        let mut table = StateTable::new();
        table.record(&PartyEntry {
            state: "Virginia".to_string(),
            year: "2010".to_string(),
            party: PartyValue::Split,
        });
        let tallies = tally(&table.grid());
        assert_eq!(tallies.len(), 1);
        assert_eq!(tallies[0].southern.split, 1);
        assert_eq!(tallies[0].overall.split, 1);
    }
}
