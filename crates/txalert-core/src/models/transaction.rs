//! Transaction records and their JSON wire form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Vendor label used when no merchant name could be extracted.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// A financial transaction detected in a notification.
///
/// Serializes to the wire form consumed by the host application:
/// `amount` as a JSON number, `timestamp` as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction amount in US dollars, always positive.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Merchant name, or the default vendor label.
    pub vendor: String,

    /// Package name of the app that posted the notification.
    pub source_app: String,

    /// Combined notification text the record was extracted from.
    pub raw_text: String,

    /// Extraction instant in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Wire record as sent by an arbitrary relay; every field may be missing.
#[derive(Deserialize)]
struct WireRecord {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    amount: Option<Decimal>,
    #[serde(default)]
    vendor: Option<String>,
    #[serde(default)]
    source_app: Option<String>,
    #[serde(default)]
    raw_text: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

impl TransactionRecord {
    /// Encode the record as a single-line JSON object.
    pub fn to_wire_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode a wire record, filling gaps the way the host bridge does.
    ///
    /// Missing `amount` becomes zero, missing `vendor` becomes
    /// [`UNKNOWN_MERCHANT`], missing strings become empty and a missing
    /// `timestamp` becomes `fallback_timestamp`.
    pub fn from_wire_json(json: &str, fallback_timestamp: i64) -> serde_json::Result<Self> {
        let wire: WireRecord = serde_json::from_str(json)?;

        Ok(Self {
            amount: wire.amount.unwrap_or(Decimal::ZERO),
            vendor: wire.vendor.unwrap_or_else(|| UNKNOWN_MERCHANT.to_string()),
            source_app: wire.source_app.unwrap_or_default(),
            raw_text: wire.raw_text.unwrap_or_default(),
            timestamp: wire.timestamp.unwrap_or(fallback_timestamp),
        })
    }

    /// Whether the vendor is the placeholder label rather than an extracted name.
    pub fn has_unknown_vendor(&self) -> bool {
        self.vendor == UNKNOWN_MERCHANT
    }
}
