//! Watch command - relay a live stream of notifications.
//!
//! Input is one JSON notification event per line; output is one wire-form
//! transaction record per line, in input order.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use console::style;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use txalert_core::{
    Classification, Clock, JsonLinesSink, MonotonicClock, NotificationEvent, RelayError,
    RelaySink, RelayStats, SystemClock, TransactionClassifier,
};

use super::load_classifier;

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Read events from a file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write records to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not print relay statistics when the stream ends
    #[arg(short, long)]
    quiet: bool,
}

pub async fn run(args: WatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let classifier = load_classifier(config_path)?;
    let clock = MonotonicClock::new(SystemClock);

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    let mut sink = JsonLinesSink::new(writer);

    let (stats, malformed) = match &args.input {
        Some(path) => {
            info!("Reading notifications from {}", path.display());
            let file = tokio::fs::File::open(path).await?;
            relay_stream(BufReader::new(file), &classifier, &clock, &mut sink).await?
        }
        None => {
            info!("Reading notifications from stdin");
            relay_stream(BufReader::new(tokio::io::stdin()), &classifier, &clock, &mut sink).await?
        }
    };

    if !args.quiet {
        print_stats(&stats, malformed);
    }

    Ok(())
}

/// Relay every line of `reader`. Returns the stats and the malformed line count.
pub async fn relay_stream<R, S>(
    reader: R,
    classifier: &TransactionClassifier,
    clock: &dyn Clock,
    sink: &mut S,
) -> anyhow::Result<(RelayStats, usize)>
where
    R: AsyncBufRead + Unpin,
    S: RelaySink + ?Sized,
{
    let mut stats = RelayStats::default();
    let mut malformed = 0usize;
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let event: NotificationEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping malformed event on line {}: {}", line_no, e);
                malformed += 1;
                continue;
            }
        };

        let outcome = classifier.evaluate(&event, clock.now_millis());
        stats.record(&outcome);

        if let Classification::Transaction(record) = outcome {
            match sink.deliver(&record) {
                Ok(()) => {}
                Err(RelayError::Closed) => {
                    debug!("Output closed, stopping after line {}", line_no);
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok((stats, malformed))
}

pub fn print_stats(stats: &RelayStats, malformed: usize) {
    eprintln!(
        "{} Relayed {} of {} notifications",
        style("✓").green(),
        style(stats.relayed).green(),
        stats.received
    );
    eprintln!(
        "   {} not allowlisted, {} without keywords, {} without amount, {} non-positive",
        stats.skipped_source, stats.skipped_keyword, stats.no_amount, stats.non_positive_amount
    );
    if malformed > 0 {
        eprintln!("   {} malformed lines skipped", style(malformed).yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txalert_core::{FixedClock, MemorySink};

    #[tokio::test]
    async fn test_relay_stream_skips_malformed_lines() {
        let input = concat!(
            r#"{"source_app":"com.venmo","short_body":"You paid $4.00 to Joe's Pizza"}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"source_app":"com.venmo","title":"Weekly tip"}"#,
            "\n",
        );
        let classifier = TransactionClassifier::new();
        let mut sink = MemorySink::default();

        let (stats, malformed) =
            relay_stream(BufReader::new(input.as_bytes()), &classifier, &FixedClock(1), &mut sink)
                .await
                .unwrap();

        assert_eq!(malformed, 1);
        assert_eq!(stats.received, 2);
        assert_eq!(stats.relayed, 1);
        assert_eq!(sink.records[0].vendor, "Joe's Pizza");
    }
}
