//! Command implementations

mod areas;
mod config;
mod custom;
mod libraries;
mod summarise;

use crate::cli::{Cli, Commands};
use crate::config_loader::{load_config, load_libraries};
use crate::output::OutputWriter;
use crate::output_types::ShapeInfo;
use anyhow::Result;
use broadcast_areas_core::config::CliConfigOverrides;
use broadcast_areas_geo::PolygonSet;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let grouping_threshold = match &cli.command {
        Commands::Summarise(args) => args.grouping_threshold,
        _ => None,
    };
    let overrides = CliConfigOverrides {
        data_dir: cli.data_dir.clone(),
        grouping_threshold,
        ..Default::default()
    };
    let config = load_config(cli.config.as_deref(), overrides)?;

    if let Commands::Config = cli.command {
        return config::execute(&config, &output);
    }

    let libraries = load_libraries(&config)?;

    match cli.command {
        Commands::Libraries => libraries::execute(&libraries, &output),
        Commands::Areas(args) => areas::execute(args, &libraries, &output),
        Commands::Summarise(args) => summarise::execute(args, &config, &libraries, &output),
        Commands::Custom(args) => custom::execute(args, &config, &libraries, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

fn shape_info(polygons: &PolygonSet) -> ShapeInfo {
    ShapeInfo {
        polygon_count: polygons.len(),
        point_count: polygons.point_count(),
        estimated_area: polygons.estimated_area(),
    }
}

fn print_shape(output: &OutputWriter, label: &str, shape: &ShapeInfo) {
    output.kv(
        label,
        format!(
            "{} polygon(s), {} point(s), {:.1} square miles",
            shape.polygon_count, shape.point_count, shape.estimated_area
        ),
    );
}

fn names_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
