//! Core library for banking notification classification.
//!
//! This crate provides:
//! - Transaction detection for notifications posted by banking apps
//! - Rule-based amount and vendor extraction (US dollar formatting)
//! - Transaction record models and their JSON wire form
//! - Relay sinks that deliver records to a host application

pub mod classifier;
pub mod clock;
pub mod error;
pub mod models;
pub mod relay;

pub use classifier::{Classification, RejectReason, TransactionClassifier};
pub use clock::{Clock, FixedClock, MonotonicClock, SystemClock};
pub use error::{ConfigError, RelayError, Result, TxAlertError};
pub use models::config::{ClassifierConfig, MatchPolicy, SourceConfig, TxAlertConfig};
pub use models::notification::NotificationEvent;
pub use models::transaction::{TransactionRecord, UNKNOWN_MERCHANT};
pub use relay::{relay_events, JsonLinesSink, MemorySink, RelaySink, RelayStats};
