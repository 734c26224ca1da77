//! Transaction classification for banking app notifications.

pub mod rules;

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::ConfigError;
use crate::models::config::{MatchPolicy, TxAlertConfig};
use crate::models::notification::NotificationEvent;
use crate::models::transaction::TransactionRecord;

use rules::{
    format_usd_amount, AmountExtractor, ExtractionMatch, FieldExtractor, KeywordGate,
    VendorExtractor,
};

/// Why a notification did not produce a transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The posting app is not on the allowlist.
    SourceNotAllowed,
    /// No transaction keyword appears in the text.
    NoKeyword,
    /// No amount pattern produced a number.
    NoAmount,
    /// The extracted amount is zero or negative.
    NonPositiveAmount,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::SourceNotAllowed => "source app is not allowlisted",
            Self::NoKeyword => "no transaction keyword",
            Self::NoAmount => "no amount found",
            Self::NonPositiveAmount => "amount is not positive",
        };
        f.write_str(reason)
    }
}

/// Outcome of classifying one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Transaction(TransactionRecord),
    Rejected(RejectReason),
}

impl Classification {
    pub fn into_record(self) -> Option<TransactionRecord> {
        match self {
            Self::Transaction(record) => Some(record),
            Self::Rejected(_) => None,
        }
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::Transaction(_) => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Every candidate match in a text, for diagnostics.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub combined_text: String,
    pub keyword: Option<String>,
    pub amounts: Vec<ExtractionMatch<Decimal>>,
    pub vendors: Vec<ExtractionMatch<String>>,
}

/// Rule-based transaction classifier.
///
/// Immutable once built; share it freely across threads.
pub struct TransactionClassifier {
    allowlist: HashSet<String>,
    keywords: KeywordGate,
    amounts: AmountExtractor,
    vendors: VendorExtractor,
    separator: String,
    default_vendor: String,
}

impl TransactionClassifier {
    /// Create a classifier with the built-in allowlist and keywords.
    pub fn new() -> Self {
        Self::build(&TxAlertConfig::default())
    }

    /// Create a classifier from a validated configuration.
    pub fn from_config(config: &TxAlertConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &TxAlertConfig) -> Self {
        let classifier = &config.classifier;
        Self {
            allowlist: config.sources.allowlist.iter().cloned().collect(),
            keywords: KeywordGate::new(&classifier.keywords),
            amounts: AmountExtractor::new().with_policy(classifier.match_policy),
            vendors: VendorExtractor::new()
                .with_policy(classifier.match_policy)
                .with_length_bounds(classifier.vendor_min_len, classifier.vendor_max_len),
            separator: classifier.text_separator.clone(),
            default_vendor: classifier.default_vendor.clone(),
        }
    }

    /// Replace the allowlist.
    pub fn with_allowlist<I, S>(mut self, apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowlist = apps.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pattern fallthrough policy for both extractors.
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.amounts = std::mem::take(&mut self.amounts).with_policy(policy);
        self.vendors = std::mem::take(&mut self.vendors).with_policy(policy);
        self
    }

    /// Whether notifications from `source_app` are eligible at all.
    pub fn should_process(&self, source_app: &str) -> bool {
        self.allowlist.contains(source_app)
    }

    /// Whether `text` mentions any transaction keyword.
    pub fn is_transaction_candidate(&self, text: &str) -> bool {
        self.keywords.is_candidate(text)
    }

    /// Extract the transaction amount from combined notification text.
    pub fn extract_amount(&self, text: &str) -> Option<Decimal> {
        self.amounts.extract(text).and_then(|m| m.value)
    }

    /// Extract the merchant name from combined notification text.
    pub fn extract_vendor(&self, text: &str) -> Option<String> {
        self.vendors.extract(text).and_then(|m| m.value)
    }

    /// Classify a notification given as separate text parts.
    pub fn classify(
        &self,
        source_app: &str,
        title: &str,
        short_body: &str,
        expanded_body: &str,
        now: i64,
    ) -> Option<TransactionRecord> {
        let event = NotificationEvent::new(source_app, title, short_body, expanded_body);
        self.evaluate(&event, now).into_record()
    }

    /// Classify a notification event, stamping the record with `clock`.
    pub fn classify_with_clock(
        &self,
        event: &NotificationEvent,
        clock: &dyn Clock,
    ) -> Option<TransactionRecord> {
        self.evaluate(event, clock.now_millis()).into_record()
    }

    /// Run the full pipeline and report why an event was rejected.
    pub fn evaluate(&self, event: &NotificationEvent, now: i64) -> Classification {
        if !self.should_process(&event.source_app) {
            return Classification::Rejected(RejectReason::SourceNotAllowed);
        }

        let text = event.combined_text(&self.separator);

        if !self.is_transaction_candidate(&text) {
            debug!("Skipping non-transaction notification from {}", event.source_app);
            return Classification::Rejected(RejectReason::NoKeyword);
        }

        let Some(amount) = self.extract_amount(&text) else {
            debug!("No amount in notification from {}", event.source_app);
            return Classification::Rejected(RejectReason::NoAmount);
        };

        if amount <= Decimal::ZERO {
            return Classification::Rejected(RejectReason::NonPositiveAmount);
        }

        let vendor = self.extract_vendor(&text);
        info!(
            "Transaction detected: {} at {}",
            format_usd_amount(amount),
            vendor.as_deref().unwrap_or("Unknown")
        );

        Classification::Transaction(TransactionRecord {
            amount,
            vendor: vendor.unwrap_or_else(|| self.default_vendor.clone()),
            source_app: event.source_app.clone(),
            raw_text: text,
            timestamp: now,
        })
    }

    /// List every amount and vendor candidate in an event's text.
    pub fn explain(&self, event: &NotificationEvent) -> Explanation {
        let combined_text = event.combined_text(&self.separator);

        Explanation {
            keyword: self.keywords.find(&combined_text).map(str::to_string),
            amounts: self.amounts.extract_all(&combined_text),
            vendors: self.vendors.extract_all(&combined_text),
            combined_text,
        }
    }

    /// Allowlisted package names, sorted.
    pub fn allowlist(&self) -> Vec<&str> {
        let mut apps: Vec<&str> = self.allowlist.iter().map(String::as_str).collect();
        apps.sort_unstable();
        apps
    }
}

impl Default for TransactionClassifier {
    fn default() -> Self {
        Self::new()
    }
}
