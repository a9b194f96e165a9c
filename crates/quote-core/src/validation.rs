//! # Validation Module
//!
//! The input boundary for numeric fields.
//!
//! ## Coercion Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Input Boundary                                     │
//! │                                                                         │
//! │  Free text "20", "17.5%", "£12.50", "2.5"                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_*()  ──► Ok(typed value)                                        │
//! │       │                                                                 │
//! │       └──────► Err(ValidationError)   (not a number, negative, ...)    │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │  *_or_zero()  ──► typed zero          NEVER NaN, NEVER negative        │
//! │                                                                         │
//! │  The pricing pipeline only ever sees typed, non-negative values.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quote_core::validation::{parse_percent, percent_or_zero};
//! use quote_core::types::Percent;
//!
//! assert_eq!(parse_percent("markup", "20").unwrap(), Percent::from_whole(20));
//! assert!(parse_percent("markup", "-5").is_err());
//! assert_eq!(percent_or_zero("markup", "abc"), Percent::zero());
//! ```

use crate::error::ValidationError;
use crate::money::{parse_scaled, Money};
use crate::types::{Percent, Quantity};
use crate::{MAX_PERCENT_BPS, MAX_PRICE_PENCE, MAX_QUANTITY_UNITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Percent Fields
// =============================================================================

/// Parses a percentage typed as a whole-number percent (`"20"`, `"17.5%"`).
///
/// ## Rules
/// - Blank input is `Required`
/// - Negative input is rejected (discounts are not supported)
/// - At most `MAX_PERCENT_BPS` basis points
/// - Digits beyond two decimal places round half-up
pub fn parse_percent(field: &str, raw: &str) -> ValidationResult<Percent> {
    let raw = raw.trim();
    let raw = raw.strip_suffix('%').unwrap_or(raw);
    let bps = parse_scaled(raw, 2, field)?;
    percent_from_bps(field, bps)
}

/// Same as [`parse_percent`], but invalid input becomes `0%`.
pub fn percent_or_zero(field: &str, raw: &str) -> Percent {
    parse_percent(field, raw).unwrap_or_default()
}

/// Validates an already-parsed percent number.
pub fn percent_from_f64(value: f64) -> ValidationResult<Percent> {
    let field = "percent";
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    let bps = parse_scaled(&format!("{value}"), 2, field)?;
    percent_from_bps(field, bps)
}

fn percent_from_bps(field: &str, bps: i64) -> ValidationResult<Percent> {
    if bps < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    if bps > i64::from(MAX_PERCENT_BPS) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::from(MAX_PERCENT_BPS / 100),
        });
    }
    Ok(Percent::from_bps(bps as u32))
}

// =============================================================================
// Quantity Fields
// =============================================================================

/// Parses a quantity such as `"3"` or `"2.5"`.
///
/// ## Rules
/// - Must be non-negative
/// - At most three decimal places are kept (half-up beyond that)
/// - At most `MAX_QUANTITY_UNITS` whole units
pub fn parse_quantity(field: &str, raw: &str) -> ValidationResult<Quantity> {
    let millis = parse_scaled(raw, 3, field)?;
    quantity_from_millis(field, millis)
}

/// Same as [`parse_quantity`], but invalid input becomes zero.
pub fn quantity_or_zero(field: &str, raw: &str) -> Quantity {
    parse_quantity(field, raw).unwrap_or_default()
}

/// Validates an already-parsed quantity number.
pub fn quantity_from_f64(value: f64) -> ValidationResult<Quantity> {
    let field = "quantity";
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    let millis = parse_scaled(&format!("{value}"), 3, field)?;
    quantity_from_millis(field, millis)
}

fn quantity_from_millis(field: &str, millis: i64) -> ValidationResult<Quantity> {
    if millis < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    if millis > MAX_QUANTITY_UNITS * Quantity::SCALE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_QUANTITY_UNITS,
        });
    }
    Ok(Quantity::from_millis(millis))
}

// =============================================================================
// Price Fields
// =============================================================================

/// Parses a unit price such as `"12.50"` or `"£1,299"`.
///
/// ## Rules
/// - Must be non-negative (zero is allowed, e.g. supplied-by-client items)
/// - At most `MAX_PRICE_PENCE`
pub fn parse_price(field: &str, raw: &str) -> ValidationResult<Money> {
    let price = Money::parse_decimal(raw).map_err(|err| rename_field(err, field))?;
    validate_price(field, price)?;
    Ok(price)
}

/// Same as [`parse_price`], but invalid input becomes `£0.00`.
pub fn price_or_zero(field: &str, raw: &str) -> Money {
    parse_price(field, raw).unwrap_or_default()
}

/// Validates a price that has already been converted to money.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    if price.pence() > MAX_PRICE_PENCE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_PENCE / 100,
        });
    }
    Ok(())
}

fn rename_field(err: ValidationError, field: &str) -> ValidationError {
    let field = field.to_string();
    match err {
        ValidationError::Required { .. } => ValidationError::Required { field },
        ValidationError::NotANumber { value, .. } => ValidationError::NotANumber { field, value },
        ValidationError::MustBeNonNegative { .. } => ValidationError::MustBeNonNegative { field },
        ValidationError::OutOfRange { min, max, .. } => {
            ValidationError::OutOfRange { field, min, max }
        }
    }
}

// =============================================================================
// Other Fields
// =============================================================================

/// Parses the number of days a quote stays valid.
pub fn parse_validity_days(raw: &str) -> ValidationResult<u32> {
    let field = "validity days";
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if raw.starts_with('-') {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    raw.parse::<u32>().map_err(|_| ValidationError::NotANumber {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
