//! Configuration and library loading for CLI commands

use anyhow::{Context, Result};
use broadcast_areas_core::config::{CliConfigOverrides, LayeredConfig};
use broadcast_areas_library::AreaLibraries;
use std::path::Path;

/// Load layered configuration: defaults, then the optional file, then the
/// environment, then CLI overrides
pub fn load_config(
    config_file: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides).context("Invalid command line configuration")?;
    Ok(config)
}

/// Load and validate every library named by the configured manifest
pub fn load_libraries(config: &LayeredConfig) -> Result<AreaLibraries> {
    let manifest = config.manifest_path();
    AreaLibraries::load(&manifest)
        .with_context(|| format!("Failed to load area libraries from {}", manifest.display()))
}
