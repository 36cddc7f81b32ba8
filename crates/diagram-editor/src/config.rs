use diagram::style::{BORDER_WIDTH_BOUNDS, FONT_SIZE_BOUNDS, STROKE_WIDTH_BOUNDS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read from the working directory at start-up.
pub const CONFIG_FILE: &str = "diagram-editor.json";
/// Environment variable overriding [`CONFIG_FILE`].
pub const CONFIG_ENV: &str = "DIAGRAM_EDITOR_CONFIG";

/// Common slider metadata so bounds live in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn range(&self) -> std::ops::RangeInclusive<f32> {
        self.min..=self.max
    }
}

// Inspector ranges
pub const FONT_SIZE_RANGE: SliderRange =
    SliderRange::new(FONT_SIZE_BOUNDS.0, FONT_SIZE_BOUNDS.1, 1.0);
pub const BORDER_WIDTH_RANGE: SliderRange =
    SliderRange::new(BORDER_WIDTH_BOUNDS.0, BORDER_WIDTH_BOUNDS.1, 0.5);
pub const STROKE_WIDTH_RANGE: SliderRange =
    SliderRange::new(STROKE_WIDTH_BOUNDS.0, STROKE_WIDTH_BOUNDS.1, 0.5);

// Canvas geometry ranges
pub const NODE_WIDTH_RANGE: SliderRange =
    SliderRange::new(60.0, 400.0, 5.0);
pub const NODE_HEIGHT_RANGE: SliderRange =
    SliderRange::new(24.0, 200.0, 2.0);
pub const PORT_RADIUS_RANGE: SliderRange =
    SliderRange::new(2.0, 10.0, 0.5);
pub const DASH_RANGE: SliderRange = SliderRange::new(1.0, 20.0, 1.0);

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Editor settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest node width; nodes grow with their label.
    pub node_min_width: f32,
    pub node_height: f32,
    pub port_radius: f32,
    /// Dash and gap lengths of dotted connectors, in canvas units.
    pub dash_length: f32,
    pub gap_length: f32,
    pub zoom_and_pan: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node_min_width: 150.0,
            node_height: 40.0,
            port_radius: 4.0,
            dash_length: 5.0,
            gap_length: 5.0,
            zoom_and_pan: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        Ok(config.clamped())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reads the config file if there is one. Errors are logged and the
    /// defaults used instead.
    pub fn load_or_default() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!(
                    "error loading {}: {e}. Using default config.",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Pulls every value into its slider range.
    pub fn clamped(mut self) -> Self {
        self.node_min_width = NODE_WIDTH_RANGE.clamp(self.node_min_width);
        self.node_height = NODE_HEIGHT_RANGE.clamp(self.node_height);
        self.port_radius = PORT_RADIUS_RANGE.clamp(self.port_radius);
        self.dash_length = DASH_RANGE.clamp(self.dash_length);
        self.gap_length = DASH_RANGE.clamp(self.gap_length);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config =
            EditorConfig::from_json(r#"{"node_height": 60.0}"#).unwrap();
        assert_eq!(config.node_height, 60.0);
        assert_eq!(config.node_min_width, EditorConfig::default().node_min_width);
        assert!(config.zoom_and_pan);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = EditorConfig::from_json(
            r#"{"node_min_width": 5000.0, "port_radius": 0.0}"#,
        )
        .unwrap();
        assert_eq!(config.node_min_width, NODE_WIDTH_RANGE.max);
        assert_eq!(config.port_radius, PORT_RADIUS_RANGE.min);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = EditorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)), "got {err}");

        let err = EditorConfig::load(Path::new("/nonexistent/diagram.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)), "got {err}");
    }

    #[test]
    fn test_defaults_are_within_ranges() {
        let config = EditorConfig::default();
        assert_eq!(config.clone().clamped(), config);
        assert_eq!(FONT_SIZE_RANGE.range(), 10.0..=48.0);
        assert_eq!(STROKE_WIDTH_RANGE.clamp(0.0), 1.0);
    }
}
