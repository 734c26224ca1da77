//! Batch command - classify recorded notification files.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use txalert_core::{
    relay_events, JsonLinesSink, MonotonicClock, NotificationEvent, RelayStats, SystemClock,
    TransactionClassifier,
};

use super::load_classifier;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// JSON-lines event files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for `<name>.records.jsonl` files (default: stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    stats: RelayStats,
    malformed: usize,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let classifier = load_classifier(config_path)?;
    let clock = MonotonicClock::new(SystemClock);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "jsonl" | "ndjson" | "json")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_single_file(&path, &classifier, &clock, args.output_dir.as_deref()) {
            Ok((stats, malformed)) => {
                results.push(FileResult {
                    path,
                    stats,
                    malformed,
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        stats: RelayStats::default(),
                        malformed: 0,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let relayed: usize = results.iter().map(|r| r.stats.relayed).sum();
    let received: usize = results.iter().map(|r| r.stats.received).sum();

    eprintln!(
        "{} Processed {} files in {:?}: {} transactions in {} notifications",
        style("✓").green(),
        results.len(),
        start.elapsed(),
        style(relayed).green(),
        received
    );

    if !failed.is_empty() {
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    classifier: &TransactionClassifier,
    clock: &MonotonicClock<SystemClock>,
    output_dir: Option<&Path>,
) -> anyhow::Result<(RelayStats, usize)> {
    let content = fs::read_to_string(path)?;
    let (events, malformed) = parse_events(&content);
    if malformed > 0 {
        warn!("{}: skipped {} malformed lines", path.display(), malformed);
    }

    let writer: Box<dyn Write> = match output_dir {
        Some(dir) => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("events");
            let output_path = dir.join(format!("{}.records.jsonl", stem));
            debug!("Writing records to {}", output_path.display());
            Box::new(BufWriter::new(File::create(output_path)?))
        }
        None => Box::new(io::stdout()),
    };

    let mut sink = JsonLinesSink::new(writer);
    let stats = relay_events(classifier, events, clock, &mut sink)?;

    Ok((stats, malformed))
}

/// Parse JSON-lines events, returning them with the count of bad lines.
fn parse_events(content: &str) -> (Vec<NotificationEvent>, usize) {
    let mut events = Vec::new();
    let mut malformed = 0;

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str(line) {
            Ok(event) => events.push(event),
            Err(_) => malformed += 1,
        }
    }

    (events, malformed)
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "received",
        "relayed",
        "not_allowlisted",
        "no_keyword",
        "no_amount",
        "non_positive",
        "malformed",
        "error",
    ])?;

    for result in results {
        let s = &result.stats;
        wtr.write_record([
            result.path.display().to_string(),
            s.received.to_string(),
            s.relayed.to_string(),
            s.skipped_source.to_string(),
            s.skipped_keyword.to_string(),
            s.no_amount.to_string(),
            s.non_positive_amount.to_string(),
            result.malformed.to_string(),
            result.error.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events_counts_bad_lines() {
        let content = "{\"source_app\":\"com.venmo\"}\n\n[1,2]\n{oops\n";
        let (events, malformed) = parse_events(content);

        assert_eq!(events.len(), 1);
        assert_eq!(malformed, 2);
    }
}
