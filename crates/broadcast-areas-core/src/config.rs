use crate::error::{BroadcastAreasError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Minimum number of an upper-tier authority's children that must be touched
/// before a summary names the parent instead of the children
pub const DEFAULT_GROUPING_THRESHOLD: usize = 3;

/// How long an approved broadcast runs for
pub const DEFAULT_BROADCAST_DURATION_MINUTES: i64 = 4 * 60;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the broadcast area tooling
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Directory holding `libraries.toml` and the GeoJSON reference datasets
    pub data_dir: ConfigValue<PathBuf>,
    pub grouping_threshold: ConfigValue<usize>,
    pub broadcast_duration_minutes: ConfigValue<i64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            data_dir: ConfigValue::new(PathBuf::from("data"), ConfigSource::Default),
            grouping_threshold: ConfigValue::new(
                DEFAULT_GROUPING_THRESHOLD,
                ConfigSource::Default,
            ),
            broadcast_duration_minutes: ConfigValue::new(
                DEFAULT_BROADCAST_DURATION_MINUTES,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| BroadcastAreasError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| BroadcastAreasError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(data_dir) = file_config.data_dir {
            self.data_dir.update(data_dir, ConfigSource::File);
        }

        if let Some(threshold) = file_config.grouping_threshold {
            self.grouping_threshold.update(parse_grouping_threshold(threshold)?, ConfigSource::File);
        }

        if let Some(minutes) = file_config.broadcast_duration_minutes {
            self.broadcast_duration_minutes
                .update(parse_duration_minutes(minutes)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // BROADCAST_AREAS_DATA_DIR
        if let Ok(data_dir) = env::var("BROADCAST_AREAS_DATA_DIR") {
            self.data_dir.update(PathBuf::from(data_dir), ConfigSource::Environment);
        }

        // BROADCAST_AREAS_GROUPING_THRESHOLD
        if let Ok(threshold_str) = env::var("BROADCAST_AREAS_GROUPING_THRESHOLD") {
            match threshold_str.parse::<usize>() {
                Ok(threshold) if threshold > 0 => {
                    self.grouping_threshold.update(threshold, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid BROADCAST_AREAS_GROUPING_THRESHOLD value '{}': expected a positive integer",
                    threshold_str
                ),
            }
        }

        // BROADCAST_AREAS_DURATION_MINUTES
        if let Ok(minutes_str) = env::var("BROADCAST_AREAS_DURATION_MINUTES") {
            match minutes_str.parse::<i64>() {
                Ok(minutes) if minutes > 0 => {
                    self.broadcast_duration_minutes.update(minutes, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid BROADCAST_AREAS_DURATION_MINUTES value '{}': expected a positive number of minutes",
                    minutes_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir.update(data_dir, ConfigSource::Cli);
        }

        if let Some(threshold) = overrides.grouping_threshold {
            self.grouping_threshold.update(parse_grouping_threshold(threshold)?, ConfigSource::Cli);
        }

        if let Some(minutes) = overrides.broadcast_duration_minutes {
            self.broadcast_duration_minutes
                .update(parse_duration_minutes(minutes)?, ConfigSource::Cli);
        }

        Ok(())
    }

    /// Path of the library manifest inside the data directory
    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir.value.join("libraries.toml")
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "data_dir".to_string(),
            (self.data_dir.value.display().to_string(), self.data_dir.source),
        );

        map.insert(
            "grouping_threshold".to_string(),
            (self.grouping_threshold.value.to_string(), self.grouping_threshold.source),
        );

        map.insert(
            "broadcast_duration_minutes".to_string(),
            (
                self.broadcast_duration_minutes.value.to_string(),
                self.broadcast_duration_minutes.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    grouping_threshold: Option<usize>,
    broadcast_duration_minutes: Option<i64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub grouping_threshold: Option<usize>,
    pub broadcast_duration_minutes: Option<i64>,
}

/// Validate a grouping threshold
pub fn parse_grouping_threshold(threshold: usize) -> Result<usize> {
    if threshold == 0 {
        return Err(BroadcastAreasError::ConfigInvalid {
            key: "grouping_threshold".to_string(),
            reason: "Grouping threshold must be at least 1".to_string(),
        });
    }
    Ok(threshold)
}

/// Validate a broadcast duration
pub fn parse_duration_minutes(minutes: i64) -> Result<i64> {
    if minutes <= 0 {
        return Err(BroadcastAreasError::ConfigInvalid {
            key: "broadcast_duration_minutes".to_string(),
            reason: format!("Broadcast duration must be positive, got {}", minutes),
        });
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.data_dir.value, PathBuf::from("data"));
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert_eq!(config.grouping_threshold.value, 3);
        assert_eq!(config.broadcast_duration_minutes.value, 240);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
data_dir = "/srv/broadcast-areas"
grouping_threshold = 4
broadcast_duration_minutes = 90
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.data_dir.value, PathBuf::from("/srv/broadcast-areas"));
        assert_eq!(config.data_dir.source, ConfigSource::File);
        assert_eq!(config.grouping_threshold.value, 4);
        assert_eq!(config.broadcast_duration_minutes.value, 90);
        assert_eq!(config.manifest_path(), PathBuf::from("/srv/broadcast-areas/libraries.toml"));
    }

    #[test]
    fn test_file_rejects_zero_threshold() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "grouping_threshold = 0").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(BroadcastAreasError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            data_dir: Some(PathBuf::from("fixtures")),
            grouping_threshold: None,
            broadcast_duration_minutes: Some(30),
        };

        config.update_from_cli(overrides).unwrap();

        assert_eq!(config.data_dir.value, PathBuf::from("fixtures"));
        assert_eq!(config.data_dir.source, ConfigSource::Cli);
        assert_eq!(config.broadcast_duration_minutes.value, 30);
        assert_eq!(config.grouping_threshold.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_rejects_zero_threshold() {
        let mut config = LayeredConfig::with_defaults();

        let result = config.update_from_cli(CliConfigOverrides {
            grouping_threshold: Some(0),
            ..Default::default()
        });

        assert!(matches!(result, Err(BroadcastAreasError::ConfigInvalid { .. })));
        assert_eq!(config.grouping_threshold.value, 3);
        assert_eq!(config.grouping_threshold.source, ConfigSource::Default);
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert_eq!(map.len(), 3);
        let (threshold, source) = &map["grouping_threshold"];
        assert_eq!(threshold, "3");
        assert_eq!(*source, ConfigSource::Default);
    }
}
