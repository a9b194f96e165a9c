//! # Document Layout Engine
//!
//! Lays a computed quote onto a single fixed-size page as a draw list.
//!
//! ## Flow Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  y = margin                                                             │
//! │  ┌──────────────────────────────┬──────────────────────────────────┐   │
//! │  │ Title / Quote No.   (cursor) │ (cursor)        Issuer identity  │   │
//! │  └──────────────────────────────┴──────────────────────────────────┘   │
//! │  y = max(left, right)                                                   │
//! │  ┌──────────────────────────────┬──────────────────────────────────┐   │
//! │  │ Date / Valid until           │ ┌ Prepared for ───────────────┐  │   │
//! │  │                              │ │ recipient (bordered box)     │  │   │
//! │  └──────────────────────────────┴──────────────────────────────────┘   │
//! │  ████ Description ███████████ Qty ███ Unit price ███ Total ████████    │
//! │       material rows, then labour rows, striped by parity                │
//! │                                        Subtotal ......... £850.00       │
//! │                                        ...non-zero steps...             │
//! │                                        ████ Total ████ £1285.20 ████    │
//! │  Notes  (word-wrapped, y advances per produced line)                    │
//! │  Terms  (word-wrapped)                                                  │
//! │                                                                         │
//! │  ─────────────── footer at an absolute position ───────────────        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output is single-page. Content that runs past the footer line is still
//! drawn in full and the document reports [`QuoteDocument::overflowed`].

mod document;
mod measure;
mod svg;
mod wrap;

pub use document::{Color, DrawOp, FontWeight, PageSize, QuoteDocument, TextAlign, TextStyle};
pub use measure::{fit_to_width, HelveticaMetrics, MonospaceMetrics, TextMeasurer};
pub use wrap::{for_each_wrapped_line, wrap_text};

use serde::{Deserialize, Serialize};

use crate::line_item::{LineItem, LineItemSet};
use crate::pricing::{PricingSettings, QuoteTotals, TotalsStep};
use crate::types::{QuoteDates, QuoteMetadata};

/// Row shown in place of the table body when a quote has no line items.
pub const NO_ITEMS_LABEL: &str = "No items on this quote";

const DATE_FORMAT: &str = "%d %b %Y";

// =============================================================================
// Configuration
// =============================================================================

/// Page geometry and styling for the quote document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page: PageSize,
    pub margin: f32,
    /// Height of every table row, header included.
    pub row_height: f32,
    /// Vertical gap between blocks.
    pub block_gap: f32,
    /// Line advance as a multiple of font size.
    pub line_spacing: f32,
    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub small_size: f32,
    pub accent: Color,
    pub stripe: Color,
    pub border: Color,
    pub muted: Color,
    /// Width of the right-aligned totals block.
    pub totals_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page: PageSize::A4,
            margin: 40.0,
            row_height: 20.0,
            block_gap: 18.0,
            line_spacing: 1.4,
            title_size: 22.0,
            heading_size: 11.0,
            body_size: 9.5,
            small_size: 8.0,
            accent: Color::ACCENT,
            stripe: Color::STRIPE,
            border: Color::BORDER,
            muted: Color::MUTED,
            totals_width: 230.0,
        }
    }
}

impl LayoutConfig {
    fn content_left(&self) -> f32 {
        self.margin
    }

    fn content_right(&self) -> f32 {
        self.page.width - self.margin
    }

    fn content_width(&self) -> f32 {
        self.content_right() - self.content_left()
    }

    /// Baseline of the footer text.
    fn footer_baseline(&self) -> f32 {
        self.page.height - self.margin
    }

    /// Separator line drawn above the footer text.
    fn footer_rule(&self) -> f32 {
        self.footer_baseline() - self.small_size * self.line_spacing - 4.0
    }
}

// =============================================================================
// Free Text
// =============================================================================

/// Optional free-text sections printed below the totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeText {
    pub notes: Option<String>,
    pub terms: Option<String>,
}

impl From<&PricingSettings> for FreeText {
    fn from(settings: &PricingSettings) -> Self {
        FreeText {
            notes: settings.notes.clone(),
            terms: settings.terms.clone(),
        }
    }
}

impl FreeText {
    /// Sections that actually have content, with their headings.
    fn sections(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [("Notes", &self.notes), ("Terms & conditions", &self.terms)]
            .into_iter()
            .filter_map(|(heading, text)| {
                text.as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(|t| (heading, t))
            })
    }
}

// =============================================================================
// Layout Engine
// =============================================================================

/// Turns computed totals plus quote metadata into a [`QuoteDocument`].
///
/// ```rust
/// use chrono::NaiveDate;
/// use quote_core::layout::{FreeText, LayoutConfig, LayoutEngine, NO_ITEMS_LABEL};
/// use quote_core::line_item::LineItemSet;
/// use quote_core::pricing::{compute_totals_for, PricingSettings};
/// use quote_core::types::{QuoteDates, QuoteMetadata};
///
/// let items = LineItemSet::default();
/// let totals = compute_totals_for(&items, &PricingSettings::default());
/// let dates = QuoteDates::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 30);
///
/// let doc = LayoutEngine::new(LayoutConfig::default()).layout(
///     &totals,
///     &QuoteMetadata::default(),
///     &dates,
///     &items,
///     &FreeText::default(),
/// );
/// assert!(doc.has_text(NO_ITEMS_LABEL));
/// assert!(doc.has_text("£0.00"));
/// ```
#[derive(Debug, Clone)]
pub struct LayoutEngine<M = HelveticaMetrics> {
    config: LayoutConfig,
    measurer: M,
}

impl LayoutEngine<HelveticaMetrics> {
    /// Engine using the built-in Helvetica metrics.
    pub fn new(config: LayoutConfig) -> Self {
        LayoutEngine {
            config,
            measurer: HelveticaMetrics,
        }
    }
}

impl<M: TextMeasurer> LayoutEngine<M> {
    /// Engine using a caller-supplied measurer (e.g. real font metrics).
    pub fn with_measurer(config: LayoutConfig, measurer: M) -> Self {
        LayoutEngine { config, measurer }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out the whole document in a single top-to-bottom pass.
    pub fn layout(
        &self,
        totals: &QuoteTotals,
        metadata: &QuoteMetadata,
        dates: &QuoteDates,
        items: &LineItemSet,
        free_text: &FreeText,
    ) -> QuoteDocument {
        let mut page = PageWriter::new(&self.config, &self.measurer);

        page.header(metadata);
        page.metadata_block(dates, metadata);
        page.line_item_table(items);
        page.totals_block(totals);
        for (heading, text) in free_text.sections() {
            page.free_text_section(heading, text);
        }
        page.footer(metadata, dates);

        page.finish()
    }
}

// =============================================================================
// Page Writer
// =============================================================================

/// Mutable state of one layout pass: the draw list and the shared cursor.
struct PageWriter<'a> {
    cfg: &'a LayoutConfig,
    measurer: &'a dyn TextMeasurer,
    ops: Vec<DrawOp>,
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(cfg: &'a LayoutConfig, measurer: &'a dyn TextMeasurer) -> Self {
        PageWriter {
            cfg,
            measurer,
            ops: Vec::new(),
            y: cfg.margin,
        }
    }

    fn finish(self) -> QuoteDocument {
        QuoteDocument {
            page: self.cfg.page,
            ops: self.ops,
            content_bottom: self.y,
            content_limit: self.cfg.footer_rule(),
        }
    }

    // -------------------------------------------------------------------------
    // Primitives
    // -------------------------------------------------------------------------

    fn line_height(&self, style: &TextStyle) -> f32 {
        style.size * self.cfg.line_spacing
    }

    fn style(&self, size: f32) -> TextStyle {
        TextStyle::regular(size)
    }

    fn text(&mut self, x: f32, baseline: f32, text: impl Into<String>, style: TextStyle, align: TextAlign) {
        self.ops.push(DrawOp::Text {
            x,
            y: baseline,
            text: text.into(),
            style,
            align,
        });
    }

    /// Draws one line of text whose top sits at `*cursor`, then advances it.
    fn text_line(
        &mut self,
        cursor: &mut f32,
        x: f32,
        text: impl Into<String>,
        style: TextStyle,
        align: TextAlign,
    ) {
        let baseline = *cursor + style.size;
        self.text(x, baseline, text, style, align);
        *cursor += self.line_height(&style);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Option<Color>, stroke: Option<Color>) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    fn rule(&mut self, y: f32, color: Color, width: f32) {
        self.ops.push(DrawOp::Line {
            x1: self.cfg.content_left(),
            y1: y,
            x2: self.cfg.content_right(),
            y2: y,
            color,
            width,
        });
    }

    // -------------------------------------------------------------------------
    // Header
    // -------------------------------------------------------------------------

    /// Title and quote number on the left, issuer on the right, each column
    /// with its own cursor.
    fn header(&mut self, metadata: &QuoteMetadata) {
        let cfg = self.cfg;
        let left = cfg.content_left();
        let right = cfg.content_right();

        let mut left_y = self.y;
        let title = if metadata.title.trim().is_empty() {
            "Quotation"
        } else {
            metadata.title.trim()
        };
        let title_style = TextStyle::bold(cfg.title_size).with_color(cfg.accent);
        self.text_line(&mut left_y, left, title, title_style, TextAlign::Left);

        if !metadata.quote_number.trim().is_empty() {
            let style = TextStyle::bold(cfg.body_size);
            let label = format!("Quote No. {}", metadata.quote_number.trim());
            self.text_line(&mut left_y, left, label, style, TextAlign::Left);
        }
        if let Some(project) = metadata.project.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            let style = self.style(cfg.body_size).with_color(cfg.muted);
            self.text_line(&mut left_y, left, project, style, TextAlign::Left);
        }

        let mut right_y = self.y;
        for (i, line) in metadata.issuer.lines().into_iter().enumerate() {
            let style = if i == 0 {
                TextStyle::bold(cfg.heading_size)
            } else {
                self.style(cfg.small_size).with_color(cfg.muted)
            };
            self.text_line(&mut right_y, right, line, style, TextAlign::Right);
        }

        self.y = left_y.max(right_y) + cfg.block_gap / 2.0;
        self.rule(self.y, cfg.accent, 1.5);
        self.y += cfg.block_gap;
    }

    // -------------------------------------------------------------------------
    // Metadata
    // -------------------------------------------------------------------------

    /// Dates on the left, recipient in a bordered box on the right.
    fn metadata_block(&mut self, dates: &QuoteDates, metadata: &QuoteMetadata) {
        let cfg = self.cfg;
        let left = cfg.content_left();
        let body = self.style(cfg.body_size);
        let label = TextStyle::bold(cfg.body_size);

        let mut left_y = self.y;
        let rows = [
            ("Date", dates.issued_on.format(DATE_FORMAT).to_string()),
            ("Valid until", dates.valid_until.format(DATE_FORMAT).to_string()),
            ("Validity", format!("{} days", dates.validity_days)),
        ];
        for (name, value) in rows {
            let baseline = left_y + body.size;
            self.text(left, baseline, format!("{name}:"), label, TextAlign::Left);
            self.text(left + 70.0, baseline, value, body, TextAlign::Left);
            left_y += self.line_height(&body);
        }

        let padding = 8.0;
        let box_x = cfg.page.width / 2.0 + 10.0;
        let box_width = cfg.content_right() - box_x;
        let caption = self.style(cfg.small_size).with_color(cfg.muted);

        let mut lines = metadata.recipient.lines();
        if lines.is_empty() {
            lines.push("Recipient not specified".to_string());
        }
        let box_height = padding * 2.0
            + self.line_height(&caption)
            + lines.len() as f32 * self.line_height(&body);
        self.rect(box_x, self.y, box_width, box_height, None, Some(cfg.border));

        let mut right_y = self.y + padding;
        let text_x = box_x + padding;
        self.text_line(&mut right_y, text_x, "Prepared for", caption, TextAlign::Left);
        for (i, line) in lines.into_iter().enumerate() {
            let style = if i == 0 { label } else { body };
            let line = fit_to_width(&line, box_width - padding * 2.0, &style, self.measurer);
            self.text_line(&mut right_y, text_x, line, style, TextAlign::Left);
        }

        self.y = left_y.max(self.y + box_height) + cfg.block_gap;
    }

    // -------------------------------------------------------------------------
    // Line-Item Table
    // -------------------------------------------------------------------------

    fn line_item_table(&mut self, items: &LineItemSet) {
        let cfg = self.cfg;
        let columns = TableColumns::new(cfg);
        let header_style = TextStyle::bold(cfg.body_size).with_color(Color::WHITE);

        self.rect(
            cfg.content_left(),
            self.y,
            cfg.content_width(),
            cfg.row_height,
            Some(cfg.accent),
            None,
        );
        let baseline = self.row_baseline(&header_style);
        self.text(columns.description, baseline, "Description", header_style, TextAlign::Left);
        self.text(columns.quantity, baseline, "Qty", header_style, TextAlign::Right);
        self.text(columns.unit_price, baseline, "Unit price", header_style, TextAlign::Right);
        self.text(columns.total, baseline, "Total", header_style, TextAlign::Right);
        self.y += cfg.row_height;

        if items.is_empty() {
            let style = self.style(cfg.body_size).with_color(cfg.muted);
            let baseline = self.row_baseline(&style);
            self.text(columns.description, baseline, NO_ITEMS_LABEL, style, TextAlign::Left);
            self.y += cfg.row_height;
        } else {
            for (index, item) in items.iter().enumerate() {
                self.table_row(index, item, &columns);
            }
        }

        self.rule(self.y, cfg.border, 0.75);
        self.y += cfg.block_gap;
    }

    fn table_row(&mut self, index: usize, item: &LineItem, columns: &TableColumns) {
        let cfg = self.cfg;
        if index % 2 == 1 {
            self.rect(
                cfg.content_left(),
                self.y,
                cfg.content_width(),
                cfg.row_height,
                Some(cfg.stripe),
                None,
            );
        }

        let body = self.style(cfg.body_size);
        let price_style = if item.is_priced() {
            body
        } else {
            body.with_color(cfg.muted)
        };
        let baseline = self.row_baseline(&body);

        let description = fit_to_width(&item.description, columns.description_width, &body, self.measurer);
        self.text(columns.description, baseline, description, body, TextAlign::Left);
        self.text(columns.quantity, baseline, item.quantity_label(), body, TextAlign::Right);
        self.text(columns.unit_price, baseline, item.price_label(), price_style, TextAlign::Right);
        self.text(columns.total, baseline, item.total_label(), price_style, TextAlign::Right);

        self.y += cfg.row_height;
    }

    /// Baseline that vertically centres `style` in the row starting at `y`.
    fn row_baseline(&self, style: &TextStyle) -> f32 {
        self.y + (self.cfg.row_height + style.size * 0.7) / 2.0
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Every non-zero intermediate amount in pipeline order, then the
    /// emphasised grand total.
    fn totals_block(&mut self, totals: &QuoteTotals) {
        let cfg = self.cfg;
        let right = cfg.content_right();
        let left = right - cfg.totals_width;
        let padding = 8.0;
        let body = self.style(cfg.body_size);

        for line in totals.lines() {
            if line.step == TotalsStep::GrandTotal || line.amount.is_zero() {
                continue;
            }
            let baseline = self.y + body.size;
            self.text(left + padding, baseline, line.label, body, TextAlign::Left);
            self.text(right - padding, baseline, line.amount.to_string(), body, TextAlign::Right);
            self.y += self.line_height(&body);
        }

        self.y += 4.0;
        let emphasis = TextStyle::bold(cfg.heading_size).with_color(Color::WHITE);
        let height = cfg.row_height + 4.0;
        self.rect(left, self.y, cfg.totals_width, height, Some(cfg.accent), None);
        let baseline = self.y + (height + emphasis.size * 0.7) / 2.0;
        self.text(left + padding, baseline, "Total", emphasis, TextAlign::Left);
        self.text(
            right - padding,
            baseline,
            totals.grand_total.to_string(),
            emphasis,
            TextAlign::Right,
        );
        self.y += height + cfg.block_gap;
    }

    // -------------------------------------------------------------------------
    // Free Text
    // -------------------------------------------------------------------------

    /// Heading plus word-wrapped body. The cursor moves once per wrapped
    /// line as it is drawn.
    fn free_text_section(&mut self, heading: &str, text: &str) {
        let cfg = self.cfg;
        let left = cfg.content_left();
        let heading_style = TextStyle::bold(cfg.heading_size).with_color(cfg.accent);
        let body = self.style(cfg.body_size);

        let mut y = self.y;
        self.text_line(&mut y, left, heading, heading_style, TextAlign::Left);
        self.y = y;

        let measurer = self.measurer;
        let line_height = self.line_height(&body);
        for_each_wrapped_line(text, cfg.content_width(), &body, measurer, |line| {
            if !line.is_empty() {
                self.ops.push(DrawOp::Text {
                    x: left,
                    y: self.y + body.size,
                    text: line.to_string(),
                    style: body,
                    align: TextAlign::Left,
                });
            }
            self.y += line_height;
        });

        self.y += cfg.block_gap / 2.0;
    }

    // -------------------------------------------------------------------------
    // Footer
    // -------------------------------------------------------------------------

    /// Drawn at a fixed page position; the shared cursor is left untouched.
    fn footer(&mut self, metadata: &QuoteMetadata, dates: &QuoteDates) {
        let cfg = self.cfg;
        let baseline = cfg.footer_baseline();
        let style = self.style(cfg.small_size).with_color(cfg.muted);

        self.ops.push(DrawOp::Line {
            x1: cfg.content_left(),
            y1: cfg.footer_rule(),
            x2: cfg.content_right(),
            y2: cfg.footer_rule(),
            color: cfg.border,
            width: 0.5,
        });

        let issuer = metadata.issuer.name.trim();
        let left_text = match (issuer.is_empty(), metadata.quote_number.trim()) {
            (false, "") => issuer.to_string(),
            (false, number) => format!("{issuer} · Quote {number}"),
            (true, "") => String::new(),
            (true, number) => format!("Quote {number}"),
        };
        if !left_text.is_empty() {
            self.text(cfg.content_left(), baseline, left_text, style, TextAlign::Left);
        }
        self.text(
            cfg.content_right(),
            baseline,
            format!("Prices valid until {}", dates.valid_until.format(DATE_FORMAT)),
            style,
            TextAlign::Right,
        );
    }
}

/// Anchor positions of the table columns. Numeric columns are right-aligned
/// on their anchor.
struct TableColumns {
    description: f32,
    description_width: f32,
    quantity: f32,
    unit_price: f32,
    total: f32,
}

impl TableColumns {
    fn new(cfg: &LayoutConfig) -> Self {
        let padding = 6.0;
        let right = cfg.content_right() - padding;
        let total = right;
        let unit_price = right - 90.0;
        let quantity = right - 180.0;
        let description = cfg.content_left() + padding;
        TableColumns {
            description,
            description_width: quantity - 60.0 - description,
            quantity,
            unit_price,
            total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::{LineItemInput, NOT_PRICED_LABEL};
    use crate::money::Money;
    use crate::pricing::compute_totals_for;
    use crate::types::{LineKind, Party, Percent, Quantity, Unit};
    use chrono::NaiveDate;

    fn dates() -> QuoteDates {
        QuoteDates::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 30)
    }

    fn metadata() -> QuoteMetadata {
        QuoteMetadata {
            title: "Quotation".to_string(),
            quote_number: "Q-0042".to_string(),
            project: Some("Kitchen refit".to_string()),
            issuer: Party {
                name: "Hartley Building Ltd".to_string(),
                address_lines: vec!["4 Mill Lane".to_string(), "Leeds LS1 4AB".to_string()],
                email: Some("office@hartley.example".to_string()),
                phone: None,
            },
            recipient: Party {
                name: "Mrs J. Patel".to_string(),
                address_lines: vec!["12 Orchard Way".to_string()],
                email: None,
                phone: None,
            },
        }
    }

    fn kitchen_items() -> LineItemSet {
        LineItemSet::from_inputs(&[
            LineItemInput::material("Worktop", Quantity::one(), Money::from_pence(30_000)),
            LineItemInput::material("Units", Quantity::from_whole(4), Money::from_pence(5_000)),
            LineItemInput::labour("Fitting", Quantity::from_whole(10), Money::from_pence(3_500)),
        ])
        .unwrap()
    }

    fn kitchen_settings() -> PricingSettings {
        PricingSettings::with_percentages(
            Percent::from_whole(20),
            Percent::from_whole(5),
            Percent::from_whole(20),
        )
    }

    fn rects(doc: &QuoteDocument) -> Vec<(f32, Option<Color>)> {
        doc.ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { y, fill, .. } => Some((*y, *fill)),
                _ => None,
            })
            .collect()
    }

    fn text_y(doc: &QuoteDocument, needle: &str) -> Option<f32> {
        doc.ops().iter().find_map(|op| match op {
            DrawOp::Text { text, y, .. } if text == needle => Some(*y),
            _ => None,
        })
    }

    #[test]
    fn test_kitchen_quote_renders_every_section() {
        let items = kitchen_items();
        let settings = kitchen_settings();
        let totals = compute_totals_for(&items, &settings);
        let doc = LayoutEngine::new(LayoutConfig::default()).layout(
            &totals,
            &metadata(),
            &dates(),
            &items,
            &FreeText {
                notes: Some("Skip hire included.".to_string()),
                terms: Some("Payment within 14 days.".to_string()),
            },
        );

        assert!(doc.has_text("Quotation"));
        assert!(doc.has_text("Quote No. Q-0042"));
        assert!(doc.has_text("Hartley Building Ltd"));
        assert!(doc.has_text("Mrs J. Patel"));
        assert!(doc.has_text("Worktop"));
        assert!(doc.has_text("Fitting"));
        assert!(doc.has_text("Notes"));
        assert!(doc.has_text("Skip hire included."));
        assert!(doc.has_text("Terms & conditions"));
        assert!(doc.has_text(&totals.grand_total.to_string()));
        assert!(doc.has_text("Prices valid until 14 Feb 2024"));
        assert!(!doc.overflowed());
    }

    #[test]
    fn test_header_advances_past_taller_column() {
        let mut meta = metadata();
        meta.issuer.address_lines = (1..=8).map(|i| format!("Line {i}")).collect();
        let items = LineItemSet::default();
        let totals = compute_totals_for(&items, &PricingSettings::default());
        let doc = LayoutEngine::new(LayoutConfig::default()).layout(&totals, &meta, &dates(), &items, &FreeText::default());

        let last_issuer_line = text_y(&doc, "Line 8").unwrap();
        let date_label = text_y(&doc, "Date:").unwrap();
        assert!(date_label > last_issuer_line);
    }

    #[test]
    fn test_table_rows_alternate_shading() {
        let items = kitchen_items();
        let totals = compute_totals_for(&items, &kitchen_settings());
        let doc = LayoutEngine::new(LayoutConfig::default()).layout(&totals, &metadata(), &dates(), &items, &FreeText::default());
        let cfg = LayoutConfig::default();

        let header_y = rects(&doc)
            .into_iter()
            .find(|(_, fill)| *fill == Some(cfg.accent))
            .map(|(y, _)| y)
            .unwrap();
        let striped: Vec<f32> = rects(&doc)
            .into_iter()
            .filter(|(_, fill)| *fill == Some(cfg.stripe))
            .map(|(y, _)| y)
            .collect();

        // Three rows: only the second (index 1) is shaded
        assert_eq!(striped.len(), 1);
        assert!((striped[0] - (header_y + 2.0 * cfg.row_height)).abs() < 1e-3);
    }

    #[test]
    fn test_empty_quote_renders_no_items_row() {
        let items = LineItemSet::default();
        let totals = compute_totals_for(&items, &PricingSettings::default());
        let doc = LayoutEngine::new(LayoutConfig::default()).layout(&totals, &metadata(), &dates(), &items, &FreeText::default());

        assert!(doc.has_text("Description"));
        assert!(doc.has_text(NO_ITEMS_LABEL));
        assert!(doc.has_text("Total"));
        assert!(doc.has_text("£0.00"));
        // Zero amounts are hidden; only the grand total row shows money
        assert_eq!(doc.texts().filter(|t| t.starts_with('£')).count(), 1);
        assert!(!doc.has_text("Subtotal"));
    }

    #[test]
    fn test_totals_block_lists_non_zero_steps_in_order() {
        let items = kitchen_items();
        let settings = PricingSettings::with_percentages(
            Percent::from_whole(20),
            Percent::zero(),
            Percent::from_whole(20),
        );
        let totals = compute_totals_for(&items, &settings);
        let doc = LayoutEngine::new(LayoutConfig::default()).layout(&totals, &metadata(), &dates(), &items, &FreeText::default());

        assert!(!doc.texts().any(|t| t.starts_with("Contingency")));
        let subtotal = text_y(&doc, "Subtotal").unwrap();
        let markup = text_y(&doc, "Markup (20%)").unwrap();
        let vat = text_y(&doc, "VAT (20%)").unwrap();
        assert!(subtotal < markup && markup < vat);
    }

    #[test]
    fn test_unpriced_items_are_marked() {
        let items = LineItemSet::from_inputs(&[LineItemInput {
            description: "Bespoke cornice".to_string(),
            kind: LineKind::Material,
            unit: Unit::Metre,
            quantity: Some(Quantity::from_whole(6)),
            list_price: None,
            net_price: None,
        }])
        .unwrap();
        let totals = compute_totals_for(&items, &PricingSettings::default());
        let doc = LayoutEngine::new(LayoutConfig::default()).layout(&totals, &metadata(), &dates(), &items, &FreeText::default());

        assert_eq!(doc.texts().filter(|t| *t == NOT_PRICED_LABEL).count(), 2);
        assert!(doc.has_text("6 m"));
    }

    #[test]
    fn test_blank_free_text_reserves_no_space() {
        let items = kitchen_items();
        let totals = compute_totals_for(&items, &kitchen_settings());
        let engine = LayoutEngine::new(LayoutConfig::default());

        let without = engine.layout(&totals, &metadata(), &dates(), &items, &FreeText::default());
        let blank = engine.layout(
            &totals,
            &metadata(),
            &dates(),
            &items,
            &FreeText {
                notes: Some("   ".to_string()),
                terms: None,
            },
        );

        assert!(!blank.has_text("Notes"));
        assert_eq!(without.content_bottom(), blank.content_bottom());
        assert_eq!(without, blank);
    }

    #[test]
    fn test_cursor_advances_once_per_wrapped_line() {
        let items = LineItemSet::default();
        let totals = compute_totals_for(&items, &PricingSettings::default());
        let engine = LayoutEngine::with_measurer(LayoutConfig::default(), MonospaceMetrics::default());
        let cfg = engine.config().clone();
        let body = TextStyle::regular(cfg.body_size);
        let notes = "word ".repeat(200);

        let base = engine.layout(&totals, &metadata(), &dates(), &items, &FreeText::default());
        let with_notes = engine.layout(
            &totals,
            &metadata(),
            &dates(),
            &items,
            &FreeText {
                notes: Some(notes.clone()),
                terms: None,
            },
        );

        let wrapped = wrap_text(notes.trim(), cfg.content_width(), &body, &MonospaceMetrics::default());
        let heading = TextStyle::bold(cfg.heading_size);
        let expected = heading.size * cfg.line_spacing
            + wrapped.len() as f32 * body.size * cfg.line_spacing
            + cfg.block_gap / 2.0;
        assert!(wrapped.len() > 1);
        assert!((with_notes.content_bottom() - base.content_bottom() - expected).abs() < 1e-2);
    }

    #[test]
    fn test_footer_position_is_absolute() {
        let items = kitchen_items();
        let totals = compute_totals_for(&items, &kitchen_settings());
        let engine = LayoutEngine::new(LayoutConfig::default());
        let short = engine.layout(&totals, &metadata(), &dates(), &items, &FreeText::default());
        let long = engine.layout(
            &totals,
            &metadata(),
            &dates(),
            &items,
            &FreeText {
                notes: Some("A longer note. ".repeat(20)),
                terms: None,
            },
        );

        let footer = "Prices valid until 14 Feb 2024";
        assert_eq!(text_y(&short, footer), text_y(&long, footer));
        assert_eq!(text_y(&short, footer), Some(engine.config().footer_baseline()));
    }

    #[test]
    fn test_overflow_is_flagged_not_truncated() {
        let inputs: Vec<LineItemInput> = (0..60)
            .map(|i| LineItemInput::material(format!("Item {i}"), Quantity::one(), Money::from_pence(100)))
            .collect();
        let items = LineItemSet::from_inputs(&inputs).unwrap();
        let totals = compute_totals_for(&items, &PricingSettings::default());
        let doc = LayoutEngine::new(LayoutConfig::default()).layout(&totals, &metadata(), &dates(), &items, &FreeText::default());

        assert!(doc.overflowed());
        assert!(doc.has_text("Item 59"));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let items = kitchen_items();
        let totals = compute_totals_for(&items, &kitchen_settings());
        let engine = LayoutEngine::new(LayoutConfig::default());
        let free = FreeText {
            notes: Some("Note".to_string()),
            terms: Some("Terms".to_string()),
        };
        let a = engine.layout(&totals, &metadata(), &dates(), &items, &free);
        let b = engine.layout(&totals, &metadata(), &dates(), &items, &free);
        assert_eq!(a, b);
    }
}
