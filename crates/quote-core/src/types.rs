//! # Domain Types
//!
//! Value types shared by the line-item model, the pricing pipeline and the
//! document layout engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Percent      │   │    Quantity     │   │      Unit       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  millis (i64)   │   │  Each, Metre,   │       │
//! │  │  2000 = 20%     │   │  2500 = 2.5     │   │  SquareMetre .. │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineKind     │   │     Party       │   │  QuoteMetadata  │       │
//! │  │  Material       │   │  name, address  │   │  title, number  │       │
//! │  │  Labour         │   │  email, phone   │   │  issuer, client │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::validation;

// =============================================================================
// Percent
// =============================================================================

/// A non-negative percentage held in basis points.
///
/// ## Why Basis Points?
/// Users type whole-number percents (`20` means 20%), but VAT-style rates
/// like 17.5% must stay exact. 1 basis point = 0.01%, so 17.5% = 1750 bps.
///
/// The `u32` representation makes a negative adjustment unrepresentable;
/// negative input is rejected by [`validation::parse_percent`] before it gets
/// here. Serialized as the percent number users typed (`20`, `17.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Percent(u32);

impl Percent {
    /// Creates a percent from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percent from a whole number (`20` → 20%).
    #[inline]
    pub const fn from_whole(pct: u32) -> Self {
        Percent(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the percent is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

/// Coerces an already-parsed number. Negative, NaN or out-of-range input
/// becomes zero.
impl From<f64> for Percent {
    fn from(value: f64) -> Self {
        validation::percent_from_f64(value).unwrap_or_default()
    }
}

impl From<Percent> for f64 {
    fn from(value: Percent) -> Self {
        value.percentage()
    }
}

/// Renders `20%`, `17.5%`, `12.25%`.
impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{whole}%")
        } else if frac % 10 == 0 {
            write!(f, "{whole}.{}%", frac / 10)
        } else {
            write!(f, "{whole}.{frac:02}%")
        }
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// A non-negative quantity held in thousandths of a unit.
///
/// Trades quote fractional amounts (2.5 m², 0.75 hr); three decimal places
/// cover every unit in [`Unit`] without floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Quantity(i64);

impl Quantity {
    /// Number of stored steps per whole unit.
    pub const SCALE: i64 = 1_000;

    /// Creates a quantity from thousandths.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Quantity(millis)
    }

    /// Creates a quantity of whole units.
    #[inline]
    pub const fn from_whole(units: i64) -> Self {
        Quantity(units * Self::SCALE)
    }

    /// One unit.
    #[inline]
    pub const fn one() -> Self {
        Quantity(Self::SCALE)
    }

    /// Zero units.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Returns the value in thousandths.
    #[inline]
    pub const fn millis(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        validation::quantity_from_f64(value).unwrap_or_default()
    }
}

impl From<Quantity> for f64 {
    fn from(value: Quantity) -> Self {
        value.0 as f64 / Quantity::SCALE as f64
    }
}

/// Renders without trailing zeros: `3`, `2.5`, `0.125`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let frac = (self.0 % Self::SCALE).abs();
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:03}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

// =============================================================================
// Unit of Measure
// =============================================================================

/// Unit a line item is counted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Individual items (boxes, fittings, sheets).
    #[default]
    Each,
    Metre,
    SquareMetre,
    CubicMetre,
    Litre,
    Kilogram,
    Hour,
    Day,
}

impl Unit {
    /// Each-style units default to a quantity of one when none is entered.
    pub const fn is_countable(&self) -> bool {
        matches!(self, Unit::Each)
    }

    /// Short suffix used in the document table.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Unit::Each => "ea",
            Unit::Metre => "m",
            Unit::SquareMetre => "m²",
            Unit::CubicMetre => "m³",
            Unit::Litre => "L",
            Unit::Kilogram => "kg",
            Unit::Hour => "hr",
            Unit::Day => "day",
        }
    }
}

// =============================================================================
// Line Kind
// =============================================================================

/// Whether a line item is a material or a labour entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Material,
    Labour,
}

// =============================================================================
// Parties & Metadata
// =============================================================================

/// A business or person named on the quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub address_lines: Vec<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Party {
    /// Every non-empty line of the party's identity, name first.
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.address_lines.iter().cloned())
            .chain(self.email.clone())
            .chain(self.phone.clone())
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Descriptive fields printed on the quote document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteMetadata {
    /// Document title, e.g. "Quotation".
    pub title: String,
    /// Human-readable quote number, e.g. "Q-2024-0042".
    pub quote_number: String,
    /// Optional project / job description.
    pub project: Option<String>,
    pub issuer: Party,
    pub recipient: Party,
}

impl Default for QuoteMetadata {
    fn default() -> Self {
        QuoteMetadata {
            title: "Quotation".to_string(),
            quote_number: String::new(),
            project: None,
            issuer: Party::default(),
            recipient: Party::default(),
        }
    }
}

/// Issue date and the last day the quoted price holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDates {
    #[ts(as = "String")]
    pub issued_on: NaiveDate,
    #[ts(as = "String")]
    pub valid_until: NaiveDate,
    pub validity_days: u32,
}

impl QuoteDates {
    /// Builds the validity window starting on `issued_on`.
    pub fn new(issued_on: NaiveDate, validity_days: u32) -> Self {
        let valid_until = issued_on
            .checked_add_days(Days::new(u64::from(validity_days)))
            .unwrap_or(NaiveDate::MAX);
        QuoteDates {
            issued_on,
            valid_until,
            validity_days,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
