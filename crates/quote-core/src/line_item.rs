//! # Line-Item Model
//!
//! A priced material or labour entry and the pure function that resolves its
//! line total.
//!
//! ## Price Tiers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LineItemInput                          LineItem                        │
//! │  ─────────────                          ────────                        │
//! │  list_price  £14.00 ──────────────────► list_price  (display only)     │
//! │  net_price   £11.20 ──┐                                                 │
//! │                       ├─ net wins ────► unit_price  £11.20             │
//! │  quantity    None  ───┴─ Each → 1 ────► quantity    1                  │
//! │                                         line_total  £11.20             │
//! │                                                                         │
//! │  No price at all ─────────────────────► unit_price None, total £0.00,  │
//! │                                         shown as "not priced"          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LineKind, Quantity, Unit};
use crate::validation;
use crate::MAX_LINE_ITEMS;

/// Label rendered in place of a price for items with no price at all.
pub const NOT_PRICED_LABEL: &str = "not priced";

// =============================================================================
// Line Item Input
// =============================================================================

/// A material or labour record as supplied by the external project store.
///
/// Numeric fields arrive already parsed; anything invalid was coerced to
/// zero (or left absent) at the input boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub description: String,
    pub kind: LineKind,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub quantity: Option<Quantity>,
    /// Catalogue price a customer would see.
    #[serde(default)]
    pub list_price: Option<Money>,
    /// Discounted trade price the contractor actually pays.
    #[serde(default)]
    pub net_price: Option<Money>,
}

impl LineItemInput {
    /// Convenience constructor for a material priced at a single tier.
    pub fn material(description: impl Into<String>, quantity: Quantity, price: Money) -> Self {
        LineItemInput {
            description: description.into(),
            kind: LineKind::Material,
            unit: Unit::Each,
            quantity: Some(quantity),
            list_price: None,
            net_price: Some(price),
        }
    }

    /// Convenience constructor for a labour entry.
    pub fn labour(description: impl Into<String>, hours: Quantity, rate: Money) -> Self {
        LineItemInput {
            description: description.into(),
            kind: LineKind::Labour,
            unit: Unit::Hour,
            quantity: Some(hours),
            list_price: None,
            net_price: Some(rate),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A resolved line item. Read-only input to the pricing pipeline.
///
/// ## Invariants
/// - `line_total == round2(quantity * unit_price)` when priced
/// - `line_total == £0.00` and `unit_price == None` when not priced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub kind: LineKind,
    pub unit: Unit,
    #[ts(type = "number")]
    pub quantity: Quantity,
    /// Price used for every computation (net tier when present).
    pub unit_price: Option<Money>,
    /// Reference list price, kept for display only.
    pub list_price: Option<Money>,
    pub line_total: Money,
}

impl LineItem {
    /// Whether any price tier was supplied.
    #[inline]
    pub fn is_priced(&self) -> bool {
        self.unit_price.is_some()
    }

    /// Unit price as shown in the document table.
    pub fn price_label(&self) -> String {
        match self.unit_price {
            Some(price) => price.to_string(),
            None => NOT_PRICED_LABEL.to_string(),
        }
    }

    /// Line total as shown in the document table.
    pub fn total_label(&self) -> String {
        if self.is_priced() {
            self.line_total.to_string()
        } else {
            NOT_PRICED_LABEL.to_string()
        }
    }

    /// Quantity with its unit, e.g. `2.5 m²`.
    pub fn quantity_label(&self) -> String {
        format!("{} {}", self.quantity, self.unit.symbol())
    }
}

/// Resolves an input record into a priced line item.
///
/// ## Rules
/// - Quantity defaults to 1 for each-style units, 0 for measured units
/// - Net price wins over list price; list price is used only when it is the
///   sole tier present
/// - No price tier at all → not priced, total £0.00
/// - Prices that slipped past the boundary (negative, or above
///   `MAX_PRICE_PENCE`) are treated as absent
///
/// ```rust
/// use quote_core::line_item::{compute_line_total, LineItemInput};
/// use quote_core::money::Money;
/// use quote_core::types::{LineKind, Unit};
///
/// let input = LineItemInput {
///     description: "Copper elbow 15mm".into(),
///     kind: LineKind::Material,
///     unit: Unit::Each,
///     quantity: None,
///     list_price: Some(Money::from_pence(140)),
///     net_price: Some(Money::from_pence(112)),
/// };
/// let item = compute_line_total(&input);
/// assert_eq!(item.line_total, Money::from_pence(112));
/// assert_eq!(item.list_price, Some(Money::from_pence(140)));
/// ```
pub fn compute_line_total(input: &LineItemInput) -> LineItem {
    let quantity = input.quantity.unwrap_or(if input.unit.is_countable() {
        Quantity::one()
    } else {
        Quantity::zero()
    });

    let usable = |price: Option<Money>| {
        price.filter(|p| validation::validate_price("price", *p).is_ok())
    };
    let unit_price = usable(input.net_price).or_else(|| usable(input.list_price));

    let line_total = unit_price
        .map(|price| price.times_quantity(quantity))
        .unwrap_or_default();

    LineItem {
        description: input.description.trim().to_string(),
        kind: input.kind,
        unit: input.unit,
        quantity,
        unit_price,
        list_price: usable(input.list_price),
        line_total,
    }
}

/// Sums already-rounded line totals.
///
/// Each total is whole pence, so the sum cannot drift no matter how many
/// items there are.
pub fn sum_line_totals<'a, I>(items: I) -> Money
where
    I: IntoIterator<Item = &'a LineItem>,
{
    items.into_iter().map(|item| item.line_total).sum()
}

// =============================================================================
// Line Item Set
// =============================================================================

/// All line items on one quote, split by kind in entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemSet {
    pub materials: Vec<LineItem>,
    pub labour: Vec<LineItem>,
}

impl LineItemSet {
    /// Resolves and partitions raw inputs.
    ///
    /// Only an absurd item count is rejected; a list that will not fit on one
    /// page is still accepted and shows up as document overflow.
    pub fn from_inputs(inputs: &[LineItemInput]) -> CoreResult<Self> {
        if inputs.len() > MAX_LINE_ITEMS {
            return Err(CoreError::TooManyLineItems {
                max: MAX_LINE_ITEMS,
            });
        }

        let (materials, labour) = inputs
            .iter()
            .map(compute_line_total)
            .partition(|item| item.kind == LineKind::Material);

        Ok(LineItemSet { materials, labour })
    }

    /// Sum of material line totals.
    pub fn materials_total(&self) -> Money {
        sum_line_totals(&self.materials)
    }

    /// Sum of labour line totals.
    pub fn labour_total(&self) -> Money {
        sum_line_totals(&self.labour)
    }

    /// Materials first, then labour, as rows appear in the document.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.materials.iter().chain(self.labour.iter())
    }

    pub fn len(&self) -> usize {
        self.materials.len() + self.labour.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty() && self.labour.is_empty()
    }

    /// Items with no price tier at all.
    pub fn unpriced_count(&self) -> usize {
        self.iter().filter(|item| !item.is_priced()).count()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
