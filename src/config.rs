//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the moonlight.toml file.
//! It provides a centralized way to configure where calendar days begin and how the
//! text summary is laid out.

use crate::lunar::{DayBoundary, LunarError, LunarPhaseCalculator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name, resolved against the working directory
pub const DEFAULT_CONFIG_PATH: &str = "moonlight.toml";

/// Application configuration loaded from moonlight.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Calendar-day normalisation
    pub calendar: CalendarConfig,
    /// Text summary layout
    pub display: DisplayConfig,
}

/// How instants are reduced to calendar days
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CalendarConfig {
    /// Offset from UTC, in minutes, at which a new calendar day starts.
    /// 0 keeps results identical on every host; 120 would follow UTC+2.
    pub day_boundary_offset_minutes: i32,
}

/// Text summary configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// chrono strftime pattern for the date heading
    pub date_format: String,
    /// Append the moon glyph after the moon day
    pub show_glyph: bool,
    /// Print the light-source rotation used by 3D renderers
    pub show_light_rotation: bool,
    /// Width of the ASCII lunation bar in characters
    pub cycle_bar_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar: CalendarConfig {
                day_boundary_offset_minutes: 0, // UTC
            },
            display: DisplayConfig {
                date_format: "%B %-d, %Y".to_string(),
                show_glyph: true,
                show_light_rotation: false,
                cycle_bar_width: 30, // one column per moon day
            },
        }
    }
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "invalid config file format, using defaults"
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn day_boundary(&self) -> Result<DayBoundary, LunarError> {
        DayBoundary::from_offset_minutes(self.calendar.day_boundary_offset_minutes)
    }

    /// Calculator honouring the configured day boundary.
    pub fn calculator(&self) -> Result<LunarPhaseCalculator, LunarError> {
        Ok(LunarPhaseCalculator::new(self.day_boundary()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.calendar.day_boundary_offset_minutes, 0);
        assert_eq!(config.display.date_format, "%B %-d, %Y");
        assert!(config.display.show_glyph);
        assert!(!config.display.show_light_rotation);
        assert_eq!(config.display.cycle_bar_width, 30);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "calendar = 'not a table'").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.calendar.day_boundary_offset_minutes = -300;
        config.display.show_light_rotation = true;

        config.save_to_path(file.path()).unwrap();
        assert_eq!(Config::load_from_path(file.path()), config);
    }

    #[test]
    fn test_calculator_uses_offset() {
        let mut config = Config::default();
        config.calendar.day_boundary_offset_minutes = 90;
        let calculator = config.calculator().unwrap();
        assert_eq!(calculator.day_boundary().offset_minutes(), 90);

        config.calendar.day_boundary_offset_minutes = 24 * 60;
        assert_eq!(
            config.calculator(),
            Err(LunarError::InvalidDayBoundary { minutes: 1440 })
        );
    }
}
