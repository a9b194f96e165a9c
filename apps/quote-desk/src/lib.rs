//! # Quote Desk Library
//!
//! Application layer around `quote-core`: configuration, the line-item
//! fetch boundary and the quote lifecycle.
//!
//! ## Module Organization
//! ```text
//! quote_desk/
//! ├── lib.rs          ◄─── You are here (logging setup, exports)
//! ├── config.rs       ◄─── quote.toml + environment overrides
//! ├── error.rs        ◄─── DeskError and error codes
//! ├── source.rs       ◄─── LineItemSource trait, JSON file adapter
//! └── state/
//!     ├── mod.rs      ◄─── State type exports
//!     └── session.rs  ◄─── QuoteSession lifecycle controller
//! ```

pub mod config;
pub mod error;
pub mod source;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use config::QuoteDeskConfig;
pub use error::{DeskError, DeskResult, ErrorCode};
pub use source::{JsonFileSource, LineItemSource};
pub use state::{EmittedQuote, FetchTicket, PercentField, QuotePhase, QuoteSession};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,quote=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=quote_desk=trace` - Show trace for the desk only
/// - Default: INFO, with DEBUG for the quote crates
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
