//! # quote-core: Pure Quote Logic for Trade Businesses
//!
//! This crate turns priced line items into quote totals and lays the result
//! out as a single-page document. It does no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Quote Desk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 quote-desk (CLI + session)                      │   │
//! │  │   config ──► LineItemSource ──► QuoteSession ──► emit          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quote-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ line_item │  │  pricing  │  │  layout   │  │   │
//! │  │   │   Money   │  │ LineItem  │  │  Totals   │  │ Document  │  │   │
//! │  │   │  round2   │  │ ItemSet   │  │ Settings  │  │  Engine   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO LOGGING • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in integer pence, half-up rounding
//! - [`types`] - Percent, Quantity, Unit, parties and dates
//! - [`validation`] - Boundary parsing of user-entered numbers
//! - [`line_item`] - Per-line totals and the material/labour split
//! - [`pricing`] - Markup → contingency → tax pipeline
//! - [`layout`] - Flow layout into a draw list, plus SVG output
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: amounts are pence (i64), rates are basis points
//! 2. **Round Every Step**: each monetary step is rounded half-up to the penny
//! 3. **Deterministic**: the same inputs always produce the same document
//!
//! ## Example Usage
//!
//! ```rust
//! use quote_core::line_item::{LineItemInput, LineItemSet};
//! use quote_core::money::Money;
//! use quote_core::pricing::{compute_totals_for, PricingSettings};
//! use quote_core::types::{Percent, Quantity};
//!
//! let items = LineItemSet::from_inputs(&[
//!     LineItemInput::material("Plasterboard", Quantity::from_whole(10), Money::from_pence(850)),
//!     LineItemInput::labour("Boarding", Quantity::from_whole(6), Money::from_pence(3_000)),
//! ])
//! .unwrap();
//!
//! let settings = PricingSettings::with_percentages(
//!     Percent::from_whole(10),
//!     Percent::zero(),
//!     Percent::from_whole(20),
//! );
//! let totals = compute_totals_for(&items, &settings);
//!
//! // (85.00 + 180.00) × 1.10 = 291.50, + 20% VAT = 349.80
//! assert_eq!(totals.grand_total.to_string(), "£349.80");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod layout;
pub mod line_item;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use layout::{FreeText, LayoutConfig, LayoutEngine, QuoteDocument};
pub use line_item::{LineItem, LineItemInput, LineItemSet};
pub use money::{round2, Money};
pub use pricing::{compute_totals, compute_totals_for, PricingSettings, QuoteTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Symbol printed in front of every formatted amount.
pub const CURRENCY_SYMBOL: &str = "£";

/// Maximum line items on a single quote
///
/// ## Business Reason
/// Far beyond anything a trade quote holds; an import this large is a wrong
/// file. Quotes that merely outgrow the page are still priced and laid out,
/// with the document flagged as overflowed.
pub const MAX_LINE_ITEMS: usize = 100_000;

/// Upper bound for a unit price, in pence (£10,000,000).
///
/// Larger prices are treated as absent, which keeps every sum on a quote
/// well inside `i64`.
pub const MAX_PRICE_PENCE: i64 = 1_000_000_000;

/// Upper bound for any percentage field, in basis points (1000%).
pub const MAX_PERCENT_BPS: u32 = 100_000;

/// Upper bound for a line quantity, in whole units.
pub const MAX_QUANTITY_UNITS: i64 = 1_000_000;
