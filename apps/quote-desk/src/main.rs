//! # quote-desk
//!
//! Command line front end: reads line items, prices them with the configured
//! defaults (plus any overrides given on the command line), and writes the
//! quote document as SVG and JSON.
//!
//! ```text
//! quote-desk kitchen.json --quote-number Q-0042 --recipient "Mrs J. Patel" \
//!            --markup 20 --contingency 5 --tax 20 --out ./quotes
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{error, info};

use quote_core::layout::LayoutEngine;
use quote_core::types::{Party, QuoteMetadata};
use quote_desk::{
    init_tracing, DeskResult, JsonFileSource, PercentField, QuoteDeskConfig, QuoteSession,
};

#[derive(Parser, Debug)]
#[command(name = "quote-desk")]
#[command(about = "Price a list of materials and labour and lay out the quote document")]
struct Cli {
    /// JSON file with the line items (prices in pence).
    items: PathBuf,

    /// Config file (defaults to quote.toml in the platform config directory).
    #[arg(long, env = "QUOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory the SVG and JSON documents are written to.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Issue date (YYYY-MM-DD); today when omitted.
    #[arg(long)]
    issue_date: Option<NaiveDate>,

    #[arg(long, default_value = "Quotation")]
    title: String,

    #[arg(long, default_value = "")]
    quote_number: String,

    #[arg(long)]
    project: Option<String>,

    /// Customer name.
    #[arg(long, default_value = "")]
    recipient: String,

    /// Customer address line; repeat for several lines.
    #[arg(long = "recipient-line")]
    recipient_lines: Vec<String>,

    #[arg(long)]
    recipient_email: Option<String>,

    /// Markup percent, e.g. `20` or `17.5%`. Invalid input counts as 0.
    #[arg(long)]
    markup: Option<String>,

    /// Contingency percent. Invalid input counts as 0.
    #[arg(long)]
    contingency: Option<String>,

    /// Tax (VAT) percent. Invalid input counts as 0.
    #[arg(long)]
    tax: Option<String>,

    /// Days the quoted price holds. Invalid input counts as 0.
    #[arg(long)]
    validity_days: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    #[arg(long)]
    terms: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = ?e.code(), error = %e, "Quote not produced");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> DeskResult<()> {
    // An explicit --config must load; the platform default may be broken or absent
    let config = match cli.config.clone() {
        Some(path) => QuoteDeskConfig::load(Some(path))?,
        None => QuoteDeskConfig::load_or_default(None),
    };

    let metadata = QuoteMetadata {
        title: cli.title,
        quote_number: cli.quote_number,
        project: cli.project,
        issuer: config.business.to_party(),
        recipient: Party {
            name: cli.recipient,
            address_lines: cli.recipient_lines,
            email: cli.recipient_email,
            phone: None,
        },
    };
    let mut session = QuoteSession::new(metadata, config.default_settings()?);

    let source = JsonFileSource::new(cli.items);
    session.refresh(&source).await?;

    let percent_overrides = [
        (PercentField::Markup, cli.markup),
        (PercentField::Contingency, cli.contingency),
        (PercentField::Tax, cli.tax),
    ];
    for (field, raw) in percent_overrides {
        if let Some(raw) = raw {
            session.edit_percent_field(field, &raw);
        }
    }
    if let Some(raw) = cli.validity_days {
        session.edit_validity_days(&raw);
    }
    if cli.notes.is_some() {
        session.set_notes(cli.notes);
    }
    if cli.terms.is_some() {
        session.set_terms(cli.terms);
    }

    let totals = session.recompute()?;
    for line in totals.lines() {
        println!("{:<24}{:>14}", line.label, line.amount.to_string());
    }

    let engine = LayoutEngine::new(config.layout());
    let issue_date = cli.issue_date.unwrap_or_else(|| Local::now().date_naive());
    let emitted = session.emit(&engine, issue_date)?;

    tokio::fs::create_dir_all(&cli.out).await?;
    let stem = emitted.file_stem();
    let svg_path = cli.out.join(format!("{stem}.svg"));
    let json_path = cli.out.join(format!("{stem}.json"));
    tokio::fs::write(&svg_path, emitted.to_svg_bytes()).await?;
    tokio::fs::write(&json_path, emitted.to_json()?).await?;

    info!(svg = ?svg_path, json = ?json_path, revision = emitted.revision, "Quote written");
    Ok(())
}
