//! Classify command - run one notification through the classifier.

use clap::Args;
use console::style;
use tracing::debug;

use txalert_core::classifier::rules::format_usd_amount;
use txalert_core::classifier::Explanation;
use txalert_core::{Classification, Clock, NotificationEvent, SystemClock, TransactionRecord};

use super::load_classifier;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Package name of the app that posted the notification
    #[arg(short, long)]
    source: String,

    /// Notification title
    #[arg(long, default_value = "")]
    title: String,

    /// Notification body
    #[arg(long, default_value = "")]
    text: String,

    /// Expanded notification body
    #[arg(long, default_value = "")]
    big_text: String,

    /// Timestamp to stamp the record with (epoch milliseconds, default: now)
    #[arg(long)]
    now: Option<i64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show every amount and vendor candidate
    #[arg(long)]
    explain: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Wire-form JSON
    Json,
    /// CSV with header
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let classifier = load_classifier(config_path)?;

    let event = NotificationEvent::new(args.source, args.title, args.text, args.big_text);
    let now = args.now.unwrap_or_else(|| SystemClock.now_millis());

    if args.explain {
        print_explanation(&classifier.explain(&event));
    }

    match classifier.evaluate(&event, now) {
        Classification::Transaction(record) => {
            debug!("Classified notification from {}", record.source_app);
            println!("{}", format_record(&record, args.format)?);
        }
        Classification::Rejected(reason) => {
            eprintln!("{} No transaction: {}", style("ℹ").blue(), reason);
        }
    }

    Ok(())
}

pub fn format_record(record: &TransactionRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(record.to_wire_json()?),
        OutputFormat::Csv => format_csv(std::slice::from_ref(record)),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

pub fn format_csv(records: &[TransactionRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["amount", "vendor", "source_app", "timestamp", "raw_text"])?;

    for record in records {
        wtr.write_record([
            &record.amount.to_string(),
            &record.vendor,
            &record.source_app,
            &record.timestamp.to_string(),
            &record.raw_text,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data.trim_end().to_string())
}

fn format_text(record: &TransactionRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Amount: {}\n", format_usd_amount(record.amount)));
    output.push_str(&format!("Vendor: {}\n", record.vendor));
    output.push_str(&format!("Source: {}\n", record.source_app));

    let when = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(record.timestamp)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| record.timestamp.to_string());
    output.push_str(&format!("Time:   {}", when));

    output
}

fn print_explanation(explanation: &Explanation) {
    eprintln!("{}", style("Combined text:").bold());
    eprintln!("  {:?}", explanation.combined_text);
    eprintln!(
        "Keyword: {}",
        explanation.keyword.as_deref().unwrap_or("(none)")
    );

    eprintln!("{}", style("Amount candidates:").bold());
    for m in &explanation.amounts {
        let value = m.value.map(format_usd_amount).unwrap_or_else(|| "invalid".to_string());
        eprintln!("  pattern {} {:?} -> {}", m.pattern + 1, m.source, value);
    }

    eprintln!("{}", style("Vendor candidates:").bold());
    for m in &explanation.vendors {
        eprintln!(
            "  pattern {} {:?} -> {}",
            m.pattern + 1,
            m.source,
            m.value.as_deref().unwrap_or("rejected")
        );
    }
}
