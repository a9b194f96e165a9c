//! End-to-end behaviour of the quote lifecycle against in-memory sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use quote_core::layout::{LayoutConfig, LayoutEngine, NO_ITEMS_LABEL};
use quote_core::money::Money;
use quote_core::types::{Percent, QuoteMetadata, Quantity};
use quote_core::{LineItemInput, PricingSettings};
use quote_desk::{DeskError, DeskResult, LineItemSource, PercentField, QuotePhase, QuoteSession};

// =============================================================================
// Fakes
// =============================================================================

/// Returns a fixed list every time.
struct StaticSource(Vec<LineItemInput>);

#[async_trait]
impl LineItemSource for StaticSource {
    async fn fetch(&self) -> DeskResult<Vec<LineItemInput>> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

/// Always fails.
struct FailingSource;

#[async_trait]
impl LineItemSource for FailingSource {
    async fn fetch(&self) -> DeskResult<Vec<LineItemInput>> {
        Err(DeskError::Source("connection reset".to_string()))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

/// Hands out queued responses in order and counts calls.
struct ScriptedSource {
    responses: Mutex<Vec<DeskResult<Vec<LineItemInput>>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(mut responses: Vec<DeskResult<Vec<LineItemInput>>>) -> Self {
        responses.reverse();
        ScriptedSource {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LineItemSource for ScriptedSource {
    async fn fetch(&self) -> DeskResult<Vec<LineItemInput>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(DeskError::Source("script exhausted".to_string())))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn kitchen() -> Vec<LineItemInput> {
    vec![
        LineItemInput::material("Worktop", Quantity::one(), Money::from_pence(30_000)),
        LineItemInput::material("Base units", Quantity::from_whole(4), Money::from_pence(5_000)),
        LineItemInput::labour("Fitting", Quantity::from_whole(10), Money::from_pence(3_500)),
    ]
}

fn settings() -> PricingSettings {
    let mut settings = PricingSettings::with_percentages(
        Percent::from_whole(20),
        Percent::from_whole(5),
        Percent::from_whole(20),
    );
    settings.validity_days = 30;
    settings
}

fn metadata() -> QuoteMetadata {
    let mut metadata = QuoteMetadata::default();
    metadata.quote_number = "Q-0042".to_string();
    metadata.issuer.name = "Hartley Building Ltd".to_string();
    metadata.recipient.name = "Mrs J. Patel".to_string();
    metadata
}

fn engine() -> LayoutEngine {
    LayoutEngine::new(LayoutConfig::default())
}

fn issue_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_kitchen_quote_from_fetch_to_emission() {
    let mut session = QuoteSession::new(metadata(), settings());
    session.refresh(&StaticSource(kitchen())).await.unwrap();
    assert_eq!(session.phase(), &QuotePhase::Draft);

    let totals = session.recompute().unwrap();
    assert_eq!(totals.materials_total, Money::from_pence(50_000));
    assert_eq!(totals.labour_total, Money::from_pence(35_000));
    assert_eq!(totals.markup_amount, Money::from_pence(17_000));
    assert_eq!(totals.contingency_amount, Money::from_pence(5_100));
    assert_eq!(totals.tax_amount, Money::from_pence(21_420));
    assert_eq!(totals.grand_total.to_string(), "£1285.20");

    let emitted = session.emit(&engine(), issue_date()).unwrap();
    assert_eq!(emitted.revision, 1);
    assert_eq!(emitted.totals, totals);
    assert!(emitted.document.has_text("£1285.20"));
    assert!(emitted.document.has_text("Mrs J. Patel"));
    assert!(!emitted.document.overflowed());

    let svg = String::from_utf8(emitted.to_svg_bytes()).unwrap();
    assert!(svg.contains("£1285.20"));
    assert!(emitted.to_json().unwrap().contains("\"revision\": 1"));
}

#[tokio::test]
async fn test_zero_item_quote_still_emits() {
    let mut session = QuoteSession::new(metadata(), settings());
    session.refresh(&StaticSource(Vec::new())).await.unwrap();

    let totals = session.recompute().unwrap();
    assert!(totals.grand_total.is_zero());

    let emitted = session.emit(&engine(), issue_date()).unwrap();
    assert!(emitted.document.has_text(NO_ITEMS_LABEL));
    assert!(emitted.document.has_text("£0.00"));
}

#[tokio::test]
async fn test_fetch_failure_blocks_totals_and_emission() {
    let mut session = QuoteSession::new(metadata(), settings());
    let err = session.refresh(&FailingSource).await.unwrap_err();
    assert!(matches!(err, DeskError::ItemsUnavailable { .. }));
    assert!(err.to_string().contains("connection reset"));

    match session.phase() {
        QuotePhase::Failed { reason } => assert!(reason.contains("connection reset")),
        other => panic!("expected failed phase, got {other}"),
    }
    assert!(session.items().is_none());
    assert!(matches!(session.recompute(), Err(DeskError::ItemsUnavailable { .. })));
    assert!(matches!(
        session.emit(&engine(), issue_date()),
        Err(DeskError::ItemsUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_failure_after_success_drops_previous_items() {
    let source = ScriptedSource::new(vec![
        Ok(kitchen()),
        Err(DeskError::Source("timeout".to_string())),
    ]);
    let mut session = QuoteSession::new(metadata(), settings());

    session.refresh(&source).await.unwrap();
    session.recompute().unwrap();
    assert!(session.refresh(&source).await.is_err());

    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert!(session.totals().is_none());
    assert!(session.items().is_none());
}

#[tokio::test]
async fn test_recovery_after_failed_fetch() {
    let source = ScriptedSource::new(vec![
        Err(DeskError::Source("timeout".to_string())),
        Ok(kitchen()),
    ]);
    let mut session = QuoteSession::new(metadata(), settings());

    assert!(session.refresh(&source).await.is_err());
    session.refresh(&source).await.unwrap();
    assert_eq!(session.recompute().unwrap().grand_total.to_string(), "£1285.20");
}

#[tokio::test]
async fn test_superseded_fetch_result_is_discarded() {
    let mut session = QuoteSession::new(metadata(), settings());
    let slow = session.begin_fetch();
    let fast = session.begin_fetch();

    let latest = StaticSource(kitchen()).fetch().await;
    assert!(session.finish_fetch(fast, latest));

    // The older request resolves last with a different list; it must not win
    let stale = StaticSource(vec![LineItemInput::material(
        "Stale",
        Quantity::one(),
        Money::from_pence(1),
    )])
    .fetch()
    .await;
    assert!(!session.finish_fetch(slow, stale));

    let totals = session.recompute().unwrap();
    assert_eq!(totals.grand_total.to_string(), "£1285.20");
}

#[tokio::test]
async fn test_edit_makes_displayed_totals_stale() {
    let mut session = QuoteSession::new(metadata(), settings());
    session.refresh(&StaticSource(kitchen())).await.unwrap();
    session.recompute().unwrap();
    assert!(session.totals().is_some());

    session.edit_percent_field(PercentField::Contingency, "0");
    assert!(session.totals().is_none());
    assert!(matches!(
        session.emit(&engine(), issue_date()),
        Err(DeskError::NotComputed)
    ));

    // 850 → 1020 after markup, no contingency, 20% VAT → 1224.00
    let totals = session.recompute().unwrap();
    assert_eq!(totals.grand_total.to_string(), "£1224.00");
}

#[tokio::test]
async fn test_each_emission_is_a_new_document() {
    let mut session = QuoteSession::new(metadata(), settings());
    session.refresh(&StaticSource(kitchen())).await.unwrap();
    session.recompute().unwrap();
    let first = session.emit(&engine(), issue_date()).unwrap();

    session.set_tax(Percent::zero());
    assert_eq!(session.phase(), &QuotePhase::Draft);
    session.recompute().unwrap();
    let second = session.emit(&engine(), issue_date()).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.quote_id, second.quote_id);
    assert_eq!(second.revision, 2);
    assert_eq!(first.totals.grand_total.to_string(), "£1285.20");
    assert_eq!(second.totals.grand_total.to_string(), "£1071.00");
    assert!(first.document.has_text("£1285.20"));
    assert!(!second.document.has_text("£1285.20"));
    assert_eq!(first.settings.tax, Percent::from_whole(20));
}

#[tokio::test]
async fn test_negative_percent_text_is_treated_as_zero() {
    let mut session = QuoteSession::new(metadata(), settings());
    session.refresh(&StaticSource(kitchen())).await.unwrap();

    session.edit_percent_field(PercentField::Markup, "-15");
    session.edit_percent_field(PercentField::Contingency, "");
    session.edit_percent_field(PercentField::Tax, "twenty");

    let totals = session.recompute().unwrap();
    assert_eq!(totals.grand_total, totals.subtotal);
    assert!(totals.markup_amount.is_zero());
}

#[tokio::test]
async fn test_thousand_penny_items_load_and_overflow_the_page() {
    let items: Vec<LineItemInput> = (0..1000)
        .map(|i| LineItemInput::material(format!("Washer {i}"), Quantity::one(), Money::from_pence(1)))
        .collect();
    let mut session = QuoteSession::new(metadata(), PricingSettings::default());
    session.refresh(&StaticSource(items)).await.unwrap();
    assert_eq!(session.phase(), &QuotePhase::Draft);
    assert_eq!(session.items().map(|set| set.len()), Some(1000));

    let totals = session.recompute().unwrap();
    assert_eq!(totals.subtotal.to_string(), "£10.00");
    assert_eq!(totals.grand_total.to_string(), "£10.00");

    // Too long for one page: still emitted, flagged as overflowed
    let emitted = session.emit(&engine(), issue_date()).unwrap();
    assert!(emitted.document.overflowed());
    assert!(emitted.document.has_text("£10.00"));
}
