//! Delivery of transaction records to the host application.

use std::io::{ErrorKind, Write};

use serde::Serialize;
use tracing::debug;

use crate::classifier::{Classification, RejectReason, TransactionClassifier};
use crate::clock::Clock;
use crate::error::RelayError;
use crate::models::notification::NotificationEvent;
use crate::models::transaction::TransactionRecord;

/// Receiver of detected transactions.
pub trait RelaySink {
    /// Deliver one record. Records arrive in notification order.
    fn deliver(&mut self, record: &TransactionRecord) -> Result<(), RelayError>;
}

/// Writes each record as one line of wire-form JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RelaySink for JsonLinesSink<W> {
    fn deliver(&mut self, record: &TransactionRecord) -> Result<(), RelayError> {
        let line = record.to_wire_json()?;

        let written = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush());
        match written {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Err(RelayError::Closed),
            Err(e) => Err(RelayError::Write(e)),
        }
    }
}

/// Keeps delivered records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<TransactionRecord>,
}

impl RelaySink for MemorySink {
    fn deliver(&mut self, record: &TransactionRecord) -> Result<(), RelayError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Counters for one relay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelayStats {
    pub received: usize,
    pub relayed: usize,
    pub skipped_source: usize,
    pub skipped_keyword: usize,
    pub no_amount: usize,
    pub non_positive_amount: usize,
}

impl RelayStats {
    /// Account for one classified event.
    pub fn record(&mut self, outcome: &Classification) {
        self.received += 1;
        match outcome.reject_reason() {
            None => self.relayed += 1,
            Some(RejectReason::SourceNotAllowed) => self.skipped_source += 1,
            Some(RejectReason::NoKeyword) => self.skipped_keyword += 1,
            Some(RejectReason::NoAmount) => self.no_amount += 1,
            Some(RejectReason::NonPositiveAmount) => self.non_positive_amount += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.received - self.relayed
    }
}

/// Classify `events` in order and hand every detected transaction to `sink`.
///
/// The clock is read once per event. Stops at the first delivery failure.
pub fn relay_events<I, S>(
    classifier: &TransactionClassifier,
    events: I,
    clock: &dyn Clock,
    sink: &mut S,
) -> Result<RelayStats, RelayError>
where
    I: IntoIterator<Item = NotificationEvent>,
    S: RelaySink + ?Sized,
{
    let mut stats = RelayStats::default();

    for event in events {
        let outcome = classifier.evaluate(&event, clock.now_millis());
        stats.record(&outcome);

        if let Classification::Transaction(record) = outcome {
            sink.deliver(&record)?;
        }
    }

    debug!(
        "Relayed {} of {} notifications",
        stats.relayed, stats.received
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use pretty_assertions::assert_eq;
    use std::io;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn events() -> Vec<NotificationEvent> {
        vec![
            NotificationEvent::new("com.venmo", "", "You paid $4.00 to Joe's Pizza", ""),
            NotificationEvent::new("com.example.game", "", "You spent $9.99 on gems", ""),
            NotificationEvent::new("com.venmo", "Hi", "New feature available", ""),
            NotificationEvent::new("com.squareup.cash", "", "You received $20.00 from Dana Lee", ""),
        ]
    }

    #[test]
    fn test_relay_preserves_order_and_counts() {
        let classifier = TransactionClassifier::new();
        let mut sink = MemorySink::default();

        let stats = relay_events(&classifier, events(), &FixedClock(7), &mut sink).unwrap();

        assert_eq!(
            stats,
            RelayStats {
                received: 4,
                relayed: 2,
                skipped_source: 1,
                skipped_keyword: 1,
                no_amount: 0,
                non_positive_amount: 0,
            }
        );
        assert_eq!(stats.rejected(), 2);

        let vendors: Vec<&str> = sink.records.iter().map(|r| r.vendor.as_str()).collect();
        assert_eq!(vendors, vec!["Joe's Pizza", "Dana Lee"]);
        assert!(sink.records.iter().all(|r| r.timestamp == 7));
    }

    #[test]
    fn test_json_lines_sink_writes_one_line_per_record() {
        let classifier = TransactionClassifier::new();
        let mut sink = JsonLinesSink::new(Vec::new());

        relay_events(&classifier, events(), &FixedClock(7), &mut sink).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["source_app"], "com.venmo");
        assert_eq!(first["amount"].as_f64(), Some(4.0));
    }

    #[test]
    fn test_broken_pipe_reports_closed() {
        let classifier = TransactionClassifier::new();
        let mut sink = JsonLinesSink::new(ClosedPipe);

        let result = relay_events(&classifier, events(), &FixedClock(7), &mut sink);
        assert!(matches!(result, Err(RelayError::Closed)));
    }
}
