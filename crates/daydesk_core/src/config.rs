//! Board configuration constants and JSON loading.
//!
//! # Responsibility
//! - Hold every tunable constant used by geometry defaults, layout and
//!   persistence scheduling.
//! - Load overrides from a JSON file with per-field defaults.
//!
//! # Invariants
//! - Minimum note size never exceeds the default note size.
//! - Initial tab count is at least one, so notes are never created tab-less.
//! - Debounce delay is strictly positive.

use crate::model::geometry::Size;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration load/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tunable board constants.
///
/// Every field falls back to its default when omitted from JSON input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub default_note_width: f64,
    pub default_note_height: f64,
    pub min_note_width: f64,
    pub min_note_height: f64,
    pub default_zone_width: f64,
    pub default_zone_height: f64,
    pub min_zone_width: f64,
    pub min_zone_height: f64,
    pub default_note_x: f64,
    pub default_note_y: f64,
    pub default_zone_x: f64,
    pub default_zone_y: f64,
    /// Number of tabs every new note starts with.
    pub initial_tab_count: usize,
    /// Tab names are `"{prefix} {n}"`, 1-based.
    pub tab_name_prefix: String,
    pub default_zone_title: String,
    /// Viewport widths at or below this value use the compact layout.
    pub compact_breakpoint: f64,
    pub save_debounce_ms: u64,
    /// How long the "Saved" status stays visible before clearing.
    pub saved_status_linger_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_note_width: 320.0,
            default_note_height: 240.0,
            min_note_width: 250.0,
            min_note_height: 200.0,
            default_zone_width: 400.0,
            default_zone_height: 300.0,
            min_zone_width: 250.0,
            min_zone_height: 200.0,
            default_note_x: 20.0,
            default_note_y: 20.0,
            default_zone_x: 50.0,
            default_zone_y: 50.0,
            initial_tab_count: 5,
            tab_name_prefix: "Note".to_string(),
            default_zone_title: "New zone".to_string(),
            compact_breakpoint: 768.0,
            save_debounce_ms: 1500,
            saved_status_linger_ms: 2000,
        }
    }
}

impl BoardConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_tab_count == 0 {
            return Err(ConfigError::Invalid(
                "initialTabCount must be at least 1".to_string(),
            ));
        }
        if self.min_note_width <= 0.0 || self.min_note_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "minimum note size must be positive".to_string(),
            ));
        }
        if self.min_note_width > self.default_note_width
            || self.min_note_height > self.default_note_height
        {
            return Err(ConfigError::Invalid(format!(
                "minimum note size {}x{} exceeds default {}x{}",
                self.min_note_width,
                self.min_note_height,
                self.default_note_width,
                self.default_note_height
            )));
        }
        if self.min_zone_width <= 0.0 || self.min_zone_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "minimum zone size must be positive".to_string(),
            ));
        }
        if self.min_zone_width > self.default_zone_width
            || self.min_zone_height > self.default_zone_height
        {
            return Err(ConfigError::Invalid(format!(
                "minimum zone size {}x{} exceeds default {}x{}",
                self.min_zone_width,
                self.min_zone_height,
                self.default_zone_width,
                self.default_zone_height
            )));
        }
        if self.save_debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "saveDebounceMs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn min_note_size(&self) -> Size {
        Size::new(self.min_note_width, self.min_note_height)
    }

    pub fn min_zone_size(&self) -> Size {
        Size::new(self.min_zone_width, self.min_zone_height)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn saved_status_linger(&self) -> Duration {
        Duration::from_millis(self.saved_status_linger_ms)
    }

    /// Name of the 0-based tab `index` for freshly created notes.
    pub fn tab_name(&self, index: usize) -> String {
        format!("{} {}", self.tab_name_prefix, index + 1)
    }

    /// Whether a viewport of this width uses the compact (narrow) layout.
    pub fn is_compact(&self, viewport_width: f64) -> bool {
        viewport_width <= self.compact_breakpoint
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError};

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config = BoardConfig::from_json_str(r#"{"saveDebounceMs": 250}"#).unwrap();
        assert_eq!(config.save_debounce_ms, 250);
        assert_eq!(config.min_note_width, 250.0);
        assert_eq!(config.initial_tab_count, 5);
    }

    #[test]
    fn rejects_minimum_larger_than_default() {
        let err = BoardConfig::from_json_str(r#"{"minNoteWidth": 900}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_tabs() {
        let err = BoardConfig::from_json_str(r#"{"initialTabCount": 0}"#).unwrap_err();
        assert!(err.to_string().contains("initialTabCount"));
    }

    #[test]
    fn breakpoint_is_inclusive_for_compact_layout() {
        let config = BoardConfig::default();
        assert!(config.is_compact(768.0));
        assert!(!config.is_compact(769.0));
    }

    #[test]
    fn tab_names_are_one_based() {
        let config = BoardConfig::default();
        assert_eq!(config.tab_name(0), "Note 1");
        assert_eq!(config.tab_name(4), "Note 5");
    }
}
