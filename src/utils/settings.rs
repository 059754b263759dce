//! Optional TOML settings file.
//!
//! Every field has a default, so an empty file (or no file at all) is valid.
//! Command-line flags always win over values loaded here.
//!
//! ```toml
//! [database]
//! path = "plugins/PacketLogger/2024-01-01/packets_1704067200000.sqlite"
//!
//! [chart]
//! title = "Proxy traffic"
//! width = 1600
//! height = 700
//! default_mode = "size"
//! open_viewer = false
//! ```

use super::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_DB_FILE};
use super::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    /// Path to the collector's SQLite file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILE)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartSettings {
    /// Overrides the generated "Packet Totals Per Minute" style title
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default = "default_width")]
    pub width: usize,

    #[serde(default = "default_height")]
    pub height: usize,

    /// `amount` or `size`
    #[serde(default = "default_mode")]
    pub default_mode: String,

    /// Open the interactive chart in the system viewer after rendering
    #[serde(default = "default_open_viewer")]
    pub open_viewer: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            title: None,
            width: default_width(),
            height: default_height(),
            default_mode: default_mode(),
            open_viewer: default_open_viewer(),
        }
    }
}

fn default_width() -> usize {
    DEFAULT_CHART_WIDTH
}

fn default_height() -> usize {
    DEFAULT_CHART_HEIGHT
}

fn default_mode() -> String {
    "amount".to_string()
}

fn default_open_viewer() -> bool {
    true
}

impl Settings {
    /// Load settings from a TOML file
    ///
    /// # Errors
    /// * `SettingsError::Io` - If file cannot be read
    /// * `SettingsError::Parse` - If TOML is invalid
    /// * `SettingsError::Invalid` - If a value is out of range
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Parse and validate settings from a string
    pub fn load_from_str(s: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(SettingsError::Invalid(
                "database.path must be non-empty".to_string(),
            ));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(SettingsError::Invalid(format!(
                "chart.width and chart.height must be > 0, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        if self.chart.default_mode.parse::<crate::chart::DisplayMode>().is_err() {
            return Err(SettingsError::Invalid(format!(
                "chart.default_mode must be 'amount' or 'size', got '{}'",
                self.chart.default_mode
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = Settings::load_from_str("").unwrap();
        assert_eq!(settings.database.path, PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(settings.chart.width, DEFAULT_CHART_WIDTH);
        assert_eq!(settings.chart.default_mode, "amount");
        assert!(settings.chart.open_viewer);
        assert!(settings.chart.title.is_none());
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::load_from_str(
            r#"
            [database]
            path = "data/packets.sqlite"

            [chart]
            default_mode = "size"
            open_viewer = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.database.path, PathBuf::from("data/packets.sqlite"));
        assert_eq!(settings.chart.default_mode, "size");
        assert!(!settings.chart.open_viewer);
        assert_eq!(settings.chart.height, DEFAULT_CHART_HEIGHT);
    }

    #[test]
    fn test_rejects_zero_width() {
        let err = Settings::load_from_str("[chart]\nwidth = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let err = Settings::load_from_str("[chart]\ndefault_mode = \"bytes\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = Settings::load_from_str("[chart\nwidth = 3").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
