//! Configuration and settings management for LineKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Measurement defaults (colors, grid, toggles for new documents)
//! - Editor preferences (hit tolerance, display precision)
//! - Logging

use linekit_core::measurement::{DEFAULT_GRID_COLOR, DEFAULT_LINE_COLOR, DEFAULT_TEXT_COLOR};
use linekit_core::{DisplayPrecision, Measurement};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

const APP_DIR: &str = "linekit";
const CONFIG_FILE: &str = "config.toml";

/// Styling and behaviour applied to newly created measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementDefaults {
    /// Stroke color for lines (`#rrggbb`)
    pub line_color: String,
    /// Label color (`#rrggbb`)
    pub text_color: String,
    /// Grid color (`#rrggbb`)
    pub grid_color: String,
    /// Grid cell size in image pixels
    pub grid_size: f64,
    pub show_grid: bool,
    pub show_text: bool,
    /// Report lengths in real units (scaled by the ratio)
    pub show_real: bool,
    pub select_mode: bool,
    /// Lock new lines as soon as they are drawn
    pub auto_lock: bool,
    /// Round new endpoints to whole pixels
    pub pixel_perfect: bool,
}

impl Default for MeasurementDefaults {
    fn default() -> Self {
        let factory = Measurement::default();
        Self {
            line_color: DEFAULT_LINE_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            grid_color: DEFAULT_GRID_COLOR.to_string(),
            grid_size: factory.grid_size,
            show_grid: factory.show_grid,
            show_text: factory.show_text,
            show_real: factory.show_real,
            select_mode: factory.select_mode,
            auto_lock: factory.auto_lock,
            pixel_perfect: factory.pixel_perfect,
        }
    }
}

/// Editor preference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Hit-test radius in pixels for picking lines and endpoints
    pub hit_tolerance: f64,
    /// Decimal places for displayed lengths
    pub length_precision: usize,
    /// Decimal places for displayed angles
    pub angle_precision: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            hit_tolerance: 8.0,
            length_precision: 2,
            angle_precision: 1,
        }
    }
}

impl EditorSettings {
    /// Precision used when deriving displayed line labels.
    pub fn display_precision(&self) -> DisplayPrecision {
        DisplayPrecision {
            length: self.length_precision,
            angle: self.angle_precision,
            ..DisplayPrecision::default()
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub defaults: MeasurementDefaults,
    pub editor: EditorSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location: `<config_dir>/linekit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("No platform config directory".to_string())
            })
    }

    /// Load config from `path`, or `None` when there is no file there.
    pub fn load_if_exists(path: &Path) -> SettingsResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from_file(path).map(Some)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = ConfigFormat::from_path(path)?;

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.defaults.grid_size <= 0.0 || !self.defaults.grid_size.is_finite() {
            return Err(ConfigError::ValueOutOfRange {
                key: "defaults.grid_size".to_string(),
                value: self.defaults.grid_size.to_string(),
            });
        }

        if self.editor.hit_tolerance <= 0.0 || !self.editor.hit_tolerance.is_finite() {
            return Err(ConfigError::ValueOutOfRange {
                key: "editor.hit_tolerance".to_string(),
                value: self.editor.hit_tolerance.to_string(),
            });
        }

        for (key, value) in [
            ("defaults.line_color", &self.defaults.line_color),
            ("defaults.text_color", &self.defaults.text_color),
            ("defaults.grid_color", &self.defaults.grid_color),
        ] {
            if !is_hex_color(value) {
                return Err(ConfigError::InvalidColor {
                    key: key.to_string(),
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }

    /// A fresh measurement over `image` carrying the configured defaults.
    pub fn new_measurement(&self, image: impl Into<String>, name: Option<&str>) -> Measurement {
        let d = &self.defaults;
        Measurement {
            line_color: d.line_color.clone(),
            text_color: d.text_color.clone(),
            grid_color: d.grid_color.clone(),
            grid_size: d.grid_size,
            show_grid: d.show_grid,
            show_text: d.show_text,
            show_real: d.show_real,
            select_mode: d.select_mode,
            auto_lock: d.auto_lock,
            pixel_perfect: d.pixel_perfect,
            ..Measurement::new(image, name)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
