use crate::prelude::*;
use clap::Parser;

mod build;
mod error;
mod grid;
mod prelude;
mod rows;
mod tally;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Reconstruct which party controls each state legislature, per year, from typeset tables"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "LEGISLATURES_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Build the state/year CSV from a directory of documents
    Build(crate::build::App),

    /// Print the reconstructed rows of a single document
    Rows(crate::rows::App),

    /// Count legislatures by party for every year of a built CSV
    Tally(crate::tally::App),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Build(sub_app) => crate::build::run(sub_app, app.global),
        SubCommands::Rows(sub_app) => crate::rows::run(sub_app, app.global),
        SubCommands::Tally(sub_app) => crate::tally::run(sub_app, app.global),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        App::command().debug_assert();
    }

    #[test]
    fn test_build_defaults() {
        let app = App::try_parse_from(["legislatures", "build"]).unwrap();
        assert!(matches!(app.command, SubCommands::Build(_)));
        assert!(!app.global.verbose);
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let app = App::try_parse_from(["legislatures", "tally", "--verbose"]).unwrap();
        assert!(app.global.verbose);
    }
}
