use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseError;

// ------------------------------------------------------------------
// Colors
// ------------------------------------------------------------------

/// 8-bit RGB color, serialized as a `#rrggbb` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = ParseError;

    /// Accepts `#rgb` and `#rrggbb`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Color(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|_| invalid())
        };
        match hex.len() {
            3 => {
                let expand = |i: usize| {
                    let d = &hex[i..i + 1];
                    channel(&format!("{d}{d}"))
                };
                Ok(Rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

// ------------------------------------------------------------------
// Style defaults
// ------------------------------------------------------------------

/// Label given to freshly inserted nodes.
pub const NEW_NODE_LABEL: &str = "empty node";

pub const DEFAULT_NODE_FILL: Rgb = Rgb::WHITE;
pub const DEFAULT_NODE_BORDER: Rgb = Rgb::BLACK;
pub const DEFAULT_NODE_BORDER_WIDTH: f32 = 1.0;
pub const DEFAULT_NODE_TEXT: Rgb = Rgb::BLACK;
pub const DEFAULT_NODE_FONT_SIZE: f32 = 14.0;
pub const DEFAULT_FONT_FAMILY: &str =
    "'Quicksand', 'Google Sans Code', sans-serif";

pub const DEFAULT_EDGE_STROKE: Rgb = Rgb::BLACK;
pub const DEFAULT_EDGE_STROKE_WIDTH: f32 = 1.0;

/// Bounds the inspectors clamp numeric inputs to.
pub const FONT_SIZE_BOUNDS: (f32, f32) = (10.0, 48.0);
pub const BORDER_WIDTH_BOUNDS: (f32, f32) = (0.0, 10.0);
pub const STROKE_WIDTH_BOUNDS: (f32, f32) = (1.0, 10.0);

fn default_label() -> String {
    NEW_NODE_LABEL.to_string()
}
fn default_fill() -> Rgb {
    DEFAULT_NODE_FILL
}
fn default_border() -> Rgb {
    DEFAULT_NODE_BORDER
}
fn default_border_width() -> f32 {
    DEFAULT_NODE_BORDER_WIDTH
}
fn default_text() -> Rgb {
    DEFAULT_NODE_TEXT
}
fn default_font_size() -> f32 {
    DEFAULT_NODE_FONT_SIZE
}
fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}
fn default_stroke() -> Rgb {
    DEFAULT_EDGE_STROKE
}
fn default_stroke_width() -> f32 {
    DEFAULT_EDGE_STROKE_WIDTH
}

// ------------------------------------------------------------------
// Node style
// ------------------------------------------------------------------

/// Content and visual attributes of an editable node. Any attribute
/// missing from serialized data falls back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_fill")]
    pub fill: Rgb,
    #[serde(default = "default_border")]
    pub border_color: Rgb,
    #[serde(default = "default_border_width")]
    pub border_width: f32,
    #[serde(default = "default_text")]
    pub text_color: Rgb,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            label: default_label(),
            fill: DEFAULT_NODE_FILL,
            border_color: DEFAULT_NODE_BORDER,
            border_width: DEFAULT_NODE_BORDER_WIDTH,
            text_color: DEFAULT_NODE_TEXT,
            font_size: DEFAULT_NODE_FONT_SIZE,
            font_family: default_font_family(),
        }
    }
}

impl NodeStyle {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Shallow merge: every field set in `patch` overwrites ours.
    pub fn merged(&self, patch: &NodeStylePatch) -> Self {
        let mut next = self.clone();
        if let Some(label) = &patch.label {
            next.label = label.clone();
        }
        if let Some(fill) = patch.fill {
            next.fill = fill;
        }
        if let Some(border_color) = patch.border_color {
            next.border_color = border_color;
        }
        if let Some(border_width) = patch.border_width {
            next.border_width = border_width;
        }
        if let Some(text_color) = patch.text_color {
            next.text_color = text_color;
        }
        if let Some(font_size) = patch.font_size {
            next.font_size = font_size;
        }
        if let Some(font_family) = &patch.font_family {
            next.font_family = font_family.clone();
        }
        next
    }
}

/// Partial update for [`NodeStyle`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStylePatch {
    pub label: Option<String>,
    pub fill: Option<Rgb>,
    pub border_color: Option<Rgb>,
    pub border_width: Option<f32>,
    pub text_color: Option<Rgb>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
}

impl NodeStylePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ------------------------------------------------------------------
// Edge style
// ------------------------------------------------------------------

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum DashPattern {
    #[default]
    Solid,
    /// Equal dash and gap ("5 5").
    Dotted,
}

impl DashPattern {
    pub fn label(self) -> &'static str {
        match self {
            DashPattern::Solid => "Solid",
            DashPattern::Dotted => "Dotted",
        }
    }

    /// SVG-style dash array; `None` for a solid stroke.
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            DashPattern::Solid => None,
            DashPattern::Dotted => Some("5 5"),
        }
    }

    pub fn from_dash_array(dash_array: Option<&str>) -> Self {
        match dash_array {
            Some(s) if !s.trim().is_empty() => DashPattern::Dotted,
            _ => DashPattern::Solid,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    #[serde(default = "default_stroke")]
    pub stroke: Rgb,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default)]
    pub dash: DashPattern,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            stroke: DEFAULT_EDGE_STROKE,
            stroke_width: DEFAULT_EDGE_STROKE_WIDTH,
            dash: DashPattern::Solid,
        }
    }
}

impl EdgeStyle {
    pub fn merged(&self, patch: &EdgeStylePatch) -> Self {
        let mut next = self.clone();
        if let Some(stroke) = patch.stroke {
            next.stroke = stroke;
        }
        if let Some(stroke_width) = patch.stroke_width {
            next.stroke_width = stroke_width;
        }
        if let Some(dash) = patch.dash {
            next.dash = dash;
        }
        next
    }
}

/// Partial update for [`EdgeStyle`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeStylePatch {
    pub stroke: Option<Rgb>,
    pub stroke_width: Option<f32>,
    pub dash: Option<DashPattern>,
}

impl EdgeStylePatch {
    pub fn dash(dash: DashPattern) -> Self {
        Self {
            dash: Some(dash),
            ..Self::default()
        }
    }
}
