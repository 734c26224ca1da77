//! Error types for the txalert-core library.

use thiserror::Error;

/// Main error type for the txalert library.
#[derive(Error, Debug)]
pub enum TxAlertError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Relay delivery error.
    #[error("relay error: {0}")]
    Relay(#[from] RelayError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No source application is allowed, so nothing could ever be processed.
    #[error("source allowlist is empty")]
    EmptyAllowlist,

    /// No transaction keyword is configured.
    #[error("transaction keyword list is empty")]
    EmptyKeywords,

    /// A keyword is empty or whitespace only; it would match every text.
    #[error("blank transaction keyword at position {0}")]
    BlankKeyword(usize),

    /// Vendor length bounds leave no valid length.
    #[error("invalid vendor length bounds: no length is above {min} and below {max}")]
    VendorBounds { min: usize, max: usize },
}

/// Errors raised by relay sinks.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The receiving side has gone away.
    #[error("relay sink is closed")]
    Closed,

    /// Failed to encode a record into its wire form.
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// Failed to write an encoded record.
    #[error("failed to write record: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type for the txalert library.
pub type Result<T> = std::result::Result<T, TxAlertError>;
