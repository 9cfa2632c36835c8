use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Broadcast Areas - Reference areas and broadcast shapes
#[derive(Parser, Debug)]
#[command(name = "broadcast-areas")]
#[command(about = "Reference areas and broadcast-ready shapes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding libraries.toml and its datasets
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file to load before environment overrides
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the area libraries
    Libraries,

    /// List the areas in one library
    Areas(AreasArgs),

    /// Summarise a selection of areas as the regions it covers
    Summarise(SummariseArgs),

    /// Run a drawn shape through the broadcast pipeline
    Custom(CustomArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct AreasArgs {
    /// Library identifier (see `broadcast-areas libraries`)
    pub library: String,
}

#[derive(Parser, Debug)]
pub struct SummariseArgs {
    /// Area identifiers, in selection order
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Override the number of districts needed to name their county
    #[arg(long)]
    pub grouping_threshold: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct CustomArgs {
    /// GeoJSON file of polygons in longitude/latitude order
    pub path: PathBuf,

    /// Display name for the drawn shape
    #[arg(long)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "broadcast-areas",
            "summarise",
            "lad20-E07000037",
            "lad20-E07000035",
            "--json",
            "--data-dir",
            "/srv/areas",
        ]);

        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/areas")));
        match cli.command {
            Commands::Summarise(args) => {
                assert_eq!(args.ids, vec!["lad20-E07000037", "lad20-E07000035"]);
                assert_eq!(args.grouping_threshold, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_summarise_needs_an_id() {
        assert!(Cli::try_parse_from(["broadcast-areas", "summarise"]).is_err());
    }
}
