//! Browser settings: overlay appearance and expansion behavior.

use crate::model::Color;
use serde::{Deserialize, Serialize};

// ─── Overlay style ────────────────────────────────────────────────────────

/// How selection overlays are painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Fill of text and image rectangles. Default: translucent red.
    pub rect_fill: Color,

    /// Fill of freehand and clip outlines. Default: red.
    pub path_fill: Color,

    /// Stroke of freehand and clip outlines. Default: green.
    pub path_stroke: Color,

    pub stroke_width: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            rect_fill: Color::rgba8(0xFF, 0x00, 0x00, 0x40),
            path_fill: Color::rgba8(0xFF, 0x00, 0x00, 0xFF),
            path_stroke: Color::rgba8(0x00, 0x80, 0x00, 0xFF),
            stroke_width: 1.0,
        }
    }
}

// ─── Browser config ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub overlay: OverlayStyle,

    /// Expand every ancestor row of a newly selected shape or tag.
    /// Default: **true**.
    pub expand_on_select: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            overlay: OverlayStyle::default(),
            expand_on_select: true,
        }
    }
}

impl BrowserConfig {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
