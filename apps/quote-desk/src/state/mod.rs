//! # State Module
//!
//! Application state of the quote desk.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐        ┌────────────────────────────────────┐    │
//! │  │ LineItemSource   │ fetch  │          QuoteSession              │    │
//! │  │ (async, external)│ ─────► │  metadata · settings · items       │    │
//! │  └──────────────────┘        │  phase · totals · revision         │    │
//! │                              └─────────────────┬──────────────────┘    │
//! │                                                │ emit()                │
//! │                                                ▼                       │
//! │                              ┌────────────────────────────────────┐    │
//! │                              │ EmittedQuote (immutable snapshot)  │    │
//! │                              └────────────────────────────────────┘    │
//! │                                                                         │
//! │  One session per quote. Single owner, no locking: every computation    │
//! │  reads a snapshot of the session's own fields.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod session;

pub use session::{EmittedQuote, FetchTicket, PercentField, QuotePhase, QuoteSession};
