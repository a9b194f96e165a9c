//! Draw-list document model produced by the layout engine.
//!
//! Coordinates are PDF points with the origin at the top-left corner of the
//! page and `y` growing downwards. Text `y` is the baseline.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Page
// =============================================================================

/// Fixed page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

// =============================================================================
// Styling
// =============================================================================

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TEXT: Color = Color::rgb(33, 37, 41);
    pub const MUTED: Color = Color::rgb(108, 117, 125);
    pub const BORDER: Color = Color::rgb(206, 212, 218);
    pub const STRIPE: Color = Color::rgb(245, 247, 250);
    pub const ACCENT: Color = Color::rgb(31, 78, 121);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parses `#1f4e79` / `1f4e79`.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Font size, weight and colour of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TextStyle {
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
}

impl TextStyle {
    pub const fn regular(size: f32) -> Self {
        TextStyle {
            size,
            weight: FontWeight::Regular,
            color: Color::TEXT,
        }
    }

    pub const fn bold(size: f32) -> Self {
        TextStyle {
            size,
            weight: FontWeight::Bold,
            color: Color::TEXT,
        }
    }

    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Horizontal anchor of a text run relative to its `x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

// =============================================================================
// Draw Operations
// =============================================================================

/// One positioned drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
        align: TextAlign,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<Color>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        width: f32,
    },
}

// =============================================================================
// Quote Document
// =============================================================================

/// A finished, immutable quote document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    pub(crate) page: PageSize,
    pub(crate) ops: Vec<DrawOp>,
    /// Where the flowing content ended.
    pub(crate) content_bottom: f32,
    /// Lowest `y` flowing content may reach without running into the footer.
    pub(crate) content_limit: f32,
}

impl QuoteDocument {
    pub fn page(&self) -> PageSize {
        self.page
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn content_bottom(&self) -> f32 {
        self.content_bottom
    }

    pub fn content_limit(&self) -> f32 {
        self.content_limit
    }

    /// True when flowing content ran past the footer line. Nothing is
    /// truncated; the document only reports it.
    pub fn overflowed(&self) -> bool {
        self.content_bottom > self.content_limit
    }

    /// Every text run in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether any text run equals `needle` exactly.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text == needle)
    }

    /// Draw list as JSON, for renderers outside this crate.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
