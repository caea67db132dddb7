//! LineKit Settings Crate
//!
//! Handles application configuration: defaults for new measurements, editor
//! preferences and logging, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, EditorSettings, LoggingSettings, MeasurementDefaults};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
