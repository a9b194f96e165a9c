//! # Error Types
//!
//! Domain-specific error types for quote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quote-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input boundary failures                        │
//! │                                                                         │
//! │  quote-desk errors (app crate)                                         │
//! │  └── DeskError        - Lifecycle, fetch, config failures              │
//! │                                                                         │
//! │  Flow: ValidationError → coerced to 0 at the boundary (never thrown)   │
//! │        CoreError → DeskError → surfaced reason, emission blocked       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Too many line items for a single quote.
    #[error("Quote cannot have more than {max} line items")]
    TooManyLineItems { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while parsing free-text numeric fields. The quoting flow never lets
/// these escape the input boundary: callers log them and use zero instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field could not be read as a number.
    #[error("{field} is not a number: '{value}'")]
    NotANumber { field: String, value: String },

    /// Negative values are not accepted (discounts are unsupported).
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
