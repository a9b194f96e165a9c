//! # Desk Error Type
//!
//! Application-level failures of the quote desk.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Quote Desk                             │
//! │                                                                         │
//! │  LineItemSource::fetch ── Io / Json ──┐                                │
//! │                                        ▼                                │
//! │                           QuoteSession::finish_fetch                    │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                           phase = Failed { reason }                     │
//! │                                        │                                │
//! │  recompute() ─────────────► DeskError::ItemsUnavailable { reason }     │
//! │  emit() without totals ───► DeskError::NotComputed                     │
//! │                                                                         │
//! │  Nothing panics: the worst outcome is a blocked emission with the      │
//! │  reason surfaced to the user.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use quote_core::CoreError;

/// Errors raised by the quote desk.
#[derive(Debug, Error)]
pub enum DeskError {
    /// The last line-item fetch failed; no totals can be produced.
    #[error("Line items are unavailable: {reason}")]
    ItemsUnavailable { reason: String },

    /// A fetch is still in flight.
    #[error("Line items have not finished loading")]
    NotLoaded,

    /// Emission was attempted while the displayed totals are stale or absent.
    #[error("Quote totals are out of date; recompute before emitting")]
    NotComputed,

    /// The line-item source reported a failure.
    #[error("Line-item source failed: {0}")]
    Source(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Domain error from quote-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ItemsUnavailable,
    NotLoaded,
    NotComputed,
    SourceError,
    ConfigError,
    ValidationError,
    Internal,
}

impl DeskError {
    /// Maps the error onto its [`ErrorCode`].
    pub fn code(&self) -> ErrorCode {
        match self {
            DeskError::ItemsUnavailable { .. } => ErrorCode::ItemsUnavailable,
            DeskError::NotLoaded => ErrorCode::NotLoaded,
            DeskError::NotComputed => ErrorCode::NotComputed,
            DeskError::Source(_) | DeskError::Json(_) => ErrorCode::SourceError,
            DeskError::Config(_) | DeskError::Toml(_) => ErrorCode::ConfigError,
            DeskError::Core(_) => ErrorCode::ValidationError,
            DeskError::Io(_) => ErrorCode::Internal,
        }
    }

    /// True when the error blocks emission but goes away after a refetch.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DeskError::ItemsUnavailable { .. } | DeskError::NotLoaded | DeskError::Source(_)
        )
    }
}

/// Convenience type alias for Results with DeskError.
pub type DeskResult<T> = Result<T, DeskError>;
