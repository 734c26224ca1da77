//! Data models for notifications, transaction records and configuration.

pub mod config;
pub mod notification;
pub mod transaction;

pub use config::TxAlertConfig;
pub use notification::NotificationEvent;
pub use transaction::TransactionRecord;
