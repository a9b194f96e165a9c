//! SVG rendering of a [`QuoteDocument`].
//!
//! The draw list already uses a top-left origin with `y` growing downwards,
//! which is SVG's own coordinate system, so every op maps onto one element.

use std::fmt;

use super::document::{Color, DrawOp, FontWeight, QuoteDocument, TextAlign, TextStyle};

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

impl QuoteDocument {
    /// Renders the page as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        Svg(self).to_string()
    }
}

/// `Display` adapter that serialises a [`QuoteDocument`] as SVG.
struct Svg<'a>(&'a QuoteDocument);

impl fmt::Display for Svg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.0.page;
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = page.width,
            h = page.height,
        )?;
        writeln!(
            f,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            page.width,
            page.height,
            Color::WHITE.to_hex()
        )?;
        for op in &self.0.ops {
            write_op(f, op)?;
        }
        writeln!(f, "</svg>")
    }
}

fn write_op(f: &mut fmt::Formatter<'_>, op: &DrawOp) -> fmt::Result {
    match op {
        DrawOp::Text {
            x,
            y,
            text,
            style,
            align,
        } => writeln!(
            f,
            r#"<text x="{x}" y="{y}" {}{}>{}</text>"#,
            font_attrs(style),
            anchor_attr(*align),
            escape_xml(text)
        ),
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => writeln!(
            f,
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}" stroke="{}"/>"#,
            paint(*fill),
            paint(*stroke)
        ),
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        } => writeln!(
            f,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{width}"/>"#,
            color.to_hex()
        ),
    }
}

fn font_attrs(style: &TextStyle) -> String {
    let weight = match style.weight {
        FontWeight::Regular => "normal",
        FontWeight::Bold => "bold",
    };
    format!(
        r#"font-family="{FONT_FAMILY}" font-size="{}" font-weight="{weight}" fill="{}""#,
        style.size,
        style.color.to_hex()
    )
}

fn anchor_attr(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "",
        TextAlign::Center => r#" text-anchor="middle""#,
        TextAlign::Right => r#" text-anchor="end""#,
    }
}

fn paint(color: Option<Color>) -> String {
    color.map_or_else(|| "none".to_string(), |c| c.to_hex())
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
