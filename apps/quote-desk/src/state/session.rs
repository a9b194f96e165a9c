//! # Quote Session
//!
//! Owns one quote while it is being edited and gates document emission.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Quote Session Phases                               │
//! │                                                                         │
//! │   begin_fetch()                                                         │
//! │        │                                                                │
//! │        ▼            fetch failed                                        │
//! │   ┌─────────┐ ───────────────────────► ┌──────────────────┐            │
//! │   │ Loading │                          │ Failed { reason }│            │
//! │   └────┬────┘ ◄─────────────────────── └──────────────────┘            │
//! │        │ items arrived    begin_fetch()                                 │
//! │        ▼                                                                │
//! │   ┌─────────┐  recompute()  ┌──────────┐  emit()  ┌─────────┐          │
//! │   │  Draft  │ ────────────► │ Computed │ ───────► │ Emitted │          │
//! │   └─────────┘               └──────────┘          └─────────┘          │
//! │        ▲                          │                     │               │
//! │        └────────── any edit ──────┴─────────────────────┘               │
//! │                                                                         │
//! │  Displayed totals exist only in Computed / Emitted. An edit clears     │
//! │  them, so a stale grand total can never be emitted.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overlapping Fetches
//! Every fetch gets a [`FetchTicket`]. Only the most recently issued ticket
//! may apply its result; anything older is discarded (last write wins).

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use quote_core::layout::{FreeText, LayoutEngine, QuoteDocument, TextMeasurer};
use quote_core::types::{Percent, QuoteDates, QuoteMetadata};
use quote_core::{
    compute_totals_for, validation, LineItemInput, LineItemSet, PricingSettings, QuoteTotals,
};

use crate::error::{DeskError, DeskResult};
use crate::source::LineItemSource;

// =============================================================================
// Phase
// =============================================================================

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum QuotePhase {
    /// A line-item fetch is in flight.
    Loading,

    /// The latest fetch failed. Totals cannot be produced.
    Failed { reason: String },

    /// Items are present; totals are absent or out of date.
    Draft,

    /// Totals reflect the current items and settings.
    Computed,

    /// A document was produced from the current totals.
    Emitted,
}

impl QuotePhase {
    /// Whether displayed totals are current.
    pub fn has_current_totals(&self) -> bool {
        matches!(self, QuotePhase::Computed | QuotePhase::Emitted)
    }
}

impl fmt::Display for QuotePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotePhase::Loading => write!(f, "loading"),
            QuotePhase::Failed { .. } => write!(f, "failed"),
            QuotePhase::Draft => write!(f, "draft"),
            QuotePhase::Computed => write!(f, "computed"),
            QuotePhase::Emitted => write!(f, "emitted"),
        }
    }
}

/// Handle for one line-item fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Which percentage a raw text edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentField {
    Markup,
    Contingency,
    Tax,
}

impl PercentField {
    pub fn label(&self) -> &'static str {
        match self {
            PercentField::Markup => "markup",
            PercentField::Contingency => "contingency",
            PercentField::Tax => "tax",
        }
    }
}

// =============================================================================
// Emitted Quote
// =============================================================================

/// An immutable record of one emission.
///
/// Each emission is a new value with its own id and revision; later edits to
/// the session never touch it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedQuote {
    /// Unique per emission.
    pub id: Uuid,
    /// Stable for the session that produced it.
    pub quote_id: Uuid,
    /// 1 for the first emission of a session, then incrementing.
    pub revision: u32,
    pub issued_on: NaiveDate,
    pub dates: QuoteDates,
    pub metadata: QuoteMetadata,
    pub settings: PricingSettings,
    pub totals: QuoteTotals,
    pub document: QuoteDocument,
}

impl EmittedQuote {
    /// File name stem, e.g. `Q-0042-r2`.
    pub fn file_stem(&self) -> String {
        let number = self.metadata.quote_number.trim();
        let base = if number.is_empty() {
            self.quote_id.to_string()
        } else {
            number
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
                .collect()
        };
        format!("{base}-r{}", self.revision)
    }

    /// The full record as pretty JSON.
    pub fn to_json(&self) -> DeskResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The document as SVG bytes.
    pub fn to_svg_bytes(&self) -> Vec<u8> {
        self.document.to_svg().into_bytes()
    }
}

// =============================================================================
// Session
// =============================================================================

/// One quote under edit.
#[derive(Debug, Clone)]
pub struct QuoteSession {
    quote_id: Uuid,
    metadata: QuoteMetadata,
    settings: PricingSettings,
    items: Option<LineItemSet>,
    totals: Option<QuoteTotals>,
    phase: QuotePhase,
    generation: u64,
    revision: u32,
}

impl QuoteSession {
    /// A session waiting for its first fetch.
    pub fn new(metadata: QuoteMetadata, settings: PricingSettings) -> Self {
        QuoteSession {
            quote_id: Uuid::new_v4(),
            metadata,
            settings,
            items: None,
            totals: None,
            phase: QuotePhase::Loading,
            generation: 0,
            revision: 0,
        }
    }

    /// A session whose items are already known.
    pub fn with_items(
        metadata: QuoteMetadata,
        settings: PricingSettings,
        inputs: &[LineItemInput],
    ) -> DeskResult<Self> {
        let mut session = QuoteSession::new(metadata, settings);
        session.items = Some(LineItemSet::from_inputs(inputs)?);
        session.phase = QuotePhase::Draft;
        Ok(session)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn quote_id(&self) -> Uuid {
        self.quote_id
    }

    pub fn phase(&self) -> &QuotePhase {
        &self.phase
    }

    pub fn metadata(&self) -> &QuoteMetadata {
        &self.metadata
    }

    pub fn settings(&self) -> &PricingSettings {
        &self.settings
    }

    pub fn items(&self) -> Option<&LineItemSet> {
        self.items.as_ref()
    }

    /// Totals to display. `None` whenever they would be stale.
    pub fn totals(&self) -> Option<&QuoteTotals> {
        self.totals.as_ref()
    }

    /// Revision of the last emission, 0 before the first.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    /// Starts a fetch. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.totals = None;
        self.set_phase(QuotePhase::Loading);
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Applies a fetch result if `ticket` is still the latest.
    ///
    /// Returns `false` when the result was discarded as superseded.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: DeskResult<Vec<LineItemInput>>,
    ) -> bool {
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                latest = self.generation,
                "Discarding superseded line-item fetch"
            );
            return false;
        }

        let items = result.and_then(|inputs| LineItemSet::from_inputs(&inputs).map_err(DeskError::from));
        match items {
            Ok(items) => {
                info!(
                    materials = items.materials.len(),
                    labour = items.labour.len(),
                    unpriced = items.unpriced_count(),
                    "Line items loaded"
                );
                self.items = Some(items);
                self.set_phase(QuotePhase::Draft);
            }
            Err(e) => {
                warn!(error = %e, "Line-item fetch failed");
                self.items = None;
                self.set_phase(QuotePhase::Failed {
                    reason: e.to_string(),
                });
            }
        }
        true
    }

    /// Fetches from `source` and applies the result.
    pub async fn refresh<S>(&mut self, source: &S) -> DeskResult<()>
    where
        S: LineItemSource + ?Sized,
    {
        let ticket = self.begin_fetch();
        debug!(source = %source.describe(), generation = ticket.generation, "Fetching line items");
        let result = source.fetch().await;
        self.finish_fetch(ticket, result);

        match &self.phase {
            QuotePhase::Failed { reason } => Err(DeskError::ItemsUnavailable {
                reason: reason.clone(),
            }),
            _ => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    pub fn set_settings(&mut self, settings: PricingSettings) {
        self.settings = settings;
        self.invalidate("settings");
    }

    pub fn set_markup(&mut self, markup: Percent) {
        self.settings.markup = markup;
        self.invalidate("markup");
    }

    pub fn set_contingency(&mut self, contingency: Percent) {
        self.settings.contingency = contingency;
        self.invalidate("contingency");
    }

    pub fn set_tax(&mut self, tax: Percent) {
        self.settings.tax = tax;
        self.invalidate("tax");
    }

    pub fn set_validity_days(&mut self, days: u32) {
        self.settings.validity_days = days;
        self.invalidate("validity_days");
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.settings.notes = notes;
        self.invalidate("notes");
    }

    pub fn set_terms(&mut self, terms: Option<String>) {
        self.settings.terms = terms;
        self.invalidate("terms");
    }

    pub fn set_metadata(&mut self, metadata: QuoteMetadata) {
        self.metadata = metadata;
        self.invalidate("metadata");
    }

    /// Applies a percentage typed as free text.
    ///
    /// Invalid or negative input is logged and stored as `0%`. Returns the
    /// value actually stored.
    pub fn edit_percent_field(&mut self, field: PercentField, raw: &str) -> Percent {
        let value = match validation::parse_percent(field.label(), raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(field = field.label(), input = %raw, error = %e, "Coercing invalid percent to 0");
                Percent::zero()
            }
        };
        match field {
            PercentField::Markup => self.set_markup(value),
            PercentField::Contingency => self.set_contingency(value),
            PercentField::Tax => self.set_tax(value),
        }
        value
    }

    /// Applies a validity period typed as free text. Invalid input becomes 0.
    pub fn edit_validity_days(&mut self, raw: &str) -> u32 {
        let days = validation::parse_validity_days(raw).unwrap_or_else(|e| {
            warn!(input = %raw, error = %e, "Coercing invalid validity days to 0");
            0
        });
        self.set_validity_days(days);
        days
    }

    // -------------------------------------------------------------------------
    // Compute & Emit
    // -------------------------------------------------------------------------

    /// Runs the pricing pipeline over the current items and settings.
    pub fn recompute(&mut self) -> DeskResult<QuoteTotals> {
        let items = self.available_items()?;
        let totals = compute_totals_for(items, &self.settings);
        debug!(grand_total = %totals.grand_total, "Totals recomputed");
        self.totals = Some(totals);
        self.set_phase(QuotePhase::Computed);
        Ok(totals)
    }

    /// Lays out the document from the current totals.
    ///
    /// Requires `Computed`. Each call yields a new [`EmittedQuote`] with the
    /// next revision number.
    pub fn emit<M: TextMeasurer>(
        &mut self,
        engine: &LayoutEngine<M>,
        issue_date: NaiveDate,
    ) -> DeskResult<EmittedQuote> {
        let items = self.available_items()?;
        let totals = match (&self.phase, self.totals) {
            (QuotePhase::Computed, Some(totals)) => totals,
            _ => return Err(DeskError::NotComputed),
        };

        let dates = QuoteDates::new(issue_date, self.settings.validity_days);
        let document = engine.layout(
            &totals,
            &self.metadata,
            &dates,
            items,
            &FreeText::from(&self.settings),
        );
        if document.overflowed() {
            warn!(
                content_bottom = document.content_bottom(),
                limit = document.content_limit(),
                "Quote document runs past the footer"
            );
        }

        self.revision += 1;
        let emitted = EmittedQuote {
            id: Uuid::new_v4(),
            quote_id: self.quote_id,
            revision: self.revision,
            issued_on: issue_date,
            dates,
            metadata: self.metadata.clone(),
            settings: self.settings.clone(),
            totals,
            document,
        };
        info!(
            id = %emitted.id,
            revision = emitted.revision,
            grand_total = %totals.grand_total,
            "Quote emitted"
        );
        self.set_phase(QuotePhase::Emitted);
        Ok(emitted)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn available_items(&self) -> DeskResult<&LineItemSet> {
        match (&self.phase, &self.items) {
            (QuotePhase::Loading, _) => Err(DeskError::NotLoaded),
            (QuotePhase::Failed { reason }, _) => Err(DeskError::ItemsUnavailable {
                reason: reason.clone(),
            }),
            (_, Some(items)) => Ok(items),
            (_, None) => Err(DeskError::NotLoaded),
        }
    }

    /// Drops the displayed totals after an edit.
    fn invalidate(&mut self, what: &str) {
        self.totals = None;
        if self.phase.has_current_totals() {
            self.set_phase(QuotePhase::Draft);
        }
        debug!(edited = what, phase = %self.phase, "Quote edited");
    }

    fn set_phase(&mut self, phase: QuotePhase) {
        if self.phase != phase {
            debug!(from = %self.phase, to = %phase, "Quote phase changed");
            self.phase = phase;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
