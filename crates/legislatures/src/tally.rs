use std::path::PathBuf;

use legislatures_core::{tally, YearTally};

use crate::prelude::{println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "tally")]
#[command(about = "Count legislatures by party for every year of a built CSV")]
pub struct App {
    /// CSV produced by `build`
    #[arg(
        short,
        long,
        env = "LEGISLATURES_OUTPUT",
        default_value = "data/state_legislatures.csv"
    )]
    input: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let tallies = tally_file(&app.input)?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&tallies)?);
        return Ok(());
    }

    if global.verbose {
        println!("Tallied {} year(s) from {}\n", tallies.len(), app.input.display());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Year",
        "Rep",
        "Dem",
        "Split",
        "South Rep",
        "South Dem",
        "South Split"
    ]);
    for t in &tallies {
        table.add_row(prettytable::row![
            t.year,
            t.overall.rep,
            t.overall.dem,
            t.overall.split,
            t.southern.rep,
            t.southern.dem,
            t.southern.split
        ]);
    }
    table.printstd();

    Ok(())
}

pub fn tally_file(path: &std::path::Path) -> Result<Vec<YearTally>> {
    let grid = crate::grid::read_grid(path)?;
    Ok(tally(&grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use legislatures_core::PartyCounts;

    #[test]
    fn test_tally_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        std::fs::write(
            &path,
            "State,2008,2010\nTexas,Rep,Rep\nOhio,Dem,\nVirginia,Split,Dem\n",
        )
        .unwrap();

        let tallies = tally_file(&path).unwrap();
        assert_eq!(tallies.len(), 2);
        assert_eq!(
            tallies[0].overall,
            PartyCounts {
                rep: 1,
                dem: 1,
                split: 1
            }
        );
        assert_eq!(
            tallies[1].southern,
            PartyCounts {
                rep: 1,
                dem: 1,
                split: 0
            }
        );
    }

    #[test]
    fn test_tally_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(tally_file(&dir.path().join("nope.csv")).is_err());
    }
}
