//! # Pricing Pipeline
//!
//! Folds a materials total and labour line items through the ordered
//! percentage adjustments into the customer-facing price.
//!
//! ## Compounding Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  materials_total ─┐                                                     │
//! │                   ├─► subtotal                                          │
//! │  labour_total ────┘      │                                              │
//! │                          ├─ × markup% ──────► markup_amount             │
//! │                          ▼                                              │
//! │                     after_markup                                        │
//! │                          ├─ × contingency% ─► contingency_amount        │
//! │                          ▼                                              │
//! │                      net_total                                          │
//! │                          ├─ × tax% ─────────► tax_amount                │
//! │                          ▼                                              │
//! │                     grand_total                                         │
//! │                                                                         │
//! │  Each layer is charged on the previous layer, never on the subtotal.    │
//! │  Reordering the steps changes the price.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use quote_core::line_item::{compute_line_total, LineItemInput};
//! use quote_core::money::Money;
//! use quote_core::pricing::{compute_totals, PricingSettings};
//! use quote_core::types::{Percent, Quantity};
//!
//! let labour = vec![compute_line_total(&LineItemInput::labour(
//!     "Fit kitchen",
//!     Quantity::one(),
//!     Money::from_pence(35_000),
//! ))];
//! let settings = PricingSettings {
//!     markup: Percent::from_whole(20),
//!     contingency: Percent::from_whole(5),
//!     tax: Percent::from_whole(20),
//!     ..PricingSettings::default()
//! };
//!
//! let totals = compute_totals(Money::from_pence(50_000), &labour, &settings);
//! assert_eq!(totals.grand_total.to_string(), "£1285.20");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::line_item::{sum_line_totals, LineItem, LineItemSet};
use crate::money::Money;
use crate::types::Percent;

// =============================================================================
// Pricing Settings
// =============================================================================

/// Adjustments and free text owned by the quote being edited.
///
/// Every field is optional on the wire; absence means zero / empty, never an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingSettings {
    #[serde(rename = "markupPercent")]
    #[ts(type = "number")]
    pub markup: Percent,

    #[serde(rename = "contingencyPercent")]
    #[ts(type = "number")]
    pub contingency: Percent,

    #[serde(rename = "taxPercent")]
    #[ts(type = "number")]
    pub tax: Percent,

    /// Days the quoted price holds after issue.
    pub validity_days: u32,

    /// Free-text notes printed under the totals.
    pub notes: Option<String>,

    /// Free-text terms printed under the notes.
    pub terms: Option<String>,
}

impl PricingSettings {
    /// Settings with the three percentages set and nothing else.
    pub fn with_percentages(markup: Percent, contingency: Percent, tax: Percent) -> Self {
        PricingSettings {
            markup,
            contingency,
            tax,
            ..PricingSettings::default()
        }
    }
}

// =============================================================================
// Quote Totals
// =============================================================================

/// Fully-resolved pipeline output. Every intermediate amount is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub materials_total: Money,
    pub labour_total: Money,
    pub subtotal: Money,
    pub markup_amount: Money,
    pub after_markup: Money,
    pub contingency_amount: Money,
    pub net_total: Money,
    pub tax_amount: Money,
    pub grand_total: Money,

    #[ts(type = "number")]
    pub markup_percent: Percent,
    #[ts(type = "number")]
    pub contingency_percent: Percent,
    #[ts(type = "number")]
    pub tax_percent: Percent,
}

/// Which pipeline step a display line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TotalsStep {
    Materials,
    Labour,
    Subtotal,
    Markup,
    AfterMarkup,
    Contingency,
    NetTotal,
    Tax,
    GrandTotal,
}

/// One labelled amount of the totals block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalsLine {
    pub step: TotalsStep,
    pub label: String,
    pub amount: Money,
}

impl QuoteTotals {
    /// Every amount in pipeline order, grand total last.
    ///
    /// Zero amounts are included; the layout engine decides what to hide.
    pub fn lines(&self) -> Vec<TotalsLine> {
        let line = |step, label: String, amount| TotalsLine {
            step,
            label,
            amount,
        };
        vec![
            line(TotalsStep::Materials, "Materials".into(), self.materials_total),
            line(TotalsStep::Labour, "Labour".into(), self.labour_total),
            line(TotalsStep::Subtotal, "Subtotal".into(), self.subtotal),
            line(
                TotalsStep::Markup,
                format!("Markup ({})", self.markup_percent),
                self.markup_amount,
            ),
            line(TotalsStep::AfterMarkup, "After markup".into(), self.after_markup),
            line(
                TotalsStep::Contingency,
                format!("Contingency ({})", self.contingency_percent),
                self.contingency_amount,
            ),
            line(TotalsStep::NetTotal, "Net total".into(), self.net_total),
            line(
                TotalsStep::Tax,
                format!("VAT ({})", self.tax_percent),
                self.tax_amount,
            ),
            line(TotalsStep::GrandTotal, "Total".into(), self.grand_total),
        ]
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Runs the pricing pipeline.
///
/// Pure and idempotent: identical inputs always give identical output, so
/// the controller can call it on every settings keystroke. O(labour items).
///
/// Each percentage step rounds half-up to whole pence before the next step
/// consumes it, so every figure on the document adds up exactly.
pub fn compute_totals(
    materials_total: Money,
    labour: &[LineItem],
    settings: &PricingSettings,
) -> QuoteTotals {
    let labour_total = sum_line_totals(labour);
    let subtotal = materials_total + labour_total;

    let markup_amount = subtotal.percent_of(settings.markup);
    let after_markup = subtotal + markup_amount;

    let contingency_amount = after_markup.percent_of(settings.contingency);
    let net_total = after_markup + contingency_amount;

    let tax_amount = net_total.percent_of(settings.tax);
    let grand_total = net_total + tax_amount;

    QuoteTotals {
        materials_total,
        labour_total,
        subtotal,
        markup_amount,
        after_markup,
        contingency_amount,
        net_total,
        tax_amount,
        grand_total,
        markup_percent: settings.markup,
        contingency_percent: settings.contingency,
        tax_percent: settings.tax,
    }
}

/// Sums the materials of a line-item set, then runs [`compute_totals`].
pub fn compute_totals_for(items: &LineItemSet, settings: &PricingSettings) -> QuoteTotals {
    compute_totals(items.materials_total(), &items.labour, settings)
}

// =============================================================================
// Unit Tests
// =============================================================================
