//! Configuration structures for the classifier.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::models::transaction::UNKNOWN_MERCHANT;

/// Banking, card, fintech and brokerage apps monitored out of the box.
pub const DEFAULT_BANKING_APPS: &[&str] = &[
    // Major US banks
    "com.chase.sig.android",
    "com.wf.wellsfargomobile",
    "com.infonow.bofa",
    "com.citi.citimobile",
    "com.usbank.mobilebanking",
    "com.pnc.ecommerce.mobile",
    "com.tdbank",
    "com.capitalone.mobile",
    "com.key.android",
    "com.regions.mobbanking",
    "com.huntington.m",
    "com.ally.MobileBanking",
    // Credit cards
    "com.americanexpress.android.acctsvcs.us",
    "com.capitalone.creditcard.app",
    "com.discoverfinancial.mobile",
    "com.synchrony.banking",
    // Neobanks and fintech
    "com.chime.chmapplication",
    "com.sofi.mobile",
    "com.venmo",
    "com.squareup.cash",
    "com.paypal.android.p2pmobile",
    "com.zellepay.zelle",
    "com.revolut.revolut",
    "com.simple",
    "com.monzo.android",
    "com.n26.android",
    "com.varo",
    // Credit unions
    "com.navyfederal.android",
    "com.penfed.mobile.banking",
    "org.becu.mobile",
    // Brokerages (cash accounts)
    "com.robinhood.android",
    "com.fidelity.android",
    "com.schwab.mobile",
];

/// Words that mark a notification as a transaction rather than a promo.
pub const DEFAULT_TRANSACTION_KEYWORDS: &[&str] = &[
    "purchase",
    "transaction",
    "charged",
    "spent",
    "paid",
    "payment",
    "withdrew",
    "withdrawal",
    "deposit",
    "transfer",
    "sent",
    "received",
    "debit",
    "credit",
    "authorized",
    "pending",
    "completed",
];

/// Main configuration for txalert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TxAlertConfig {
    /// Which applications are monitored.
    pub sources: SourceConfig,

    /// Classification and extraction settings.
    pub classifier: ClassifierConfig,
}

/// Monitored source applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Package names eligible for processing (exact match).
    pub allowlist: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            allowlist: DEFAULT_BANKING_APPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// How extraction reacts when the first matching pattern yields an invalid value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The first pattern that matches decides, even if its value is rejected.
    #[default]
    FirstMatch,
    /// Rejected values fall through to the next pattern.
    FirstValid,
}

/// Classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Transaction keywords, matched as case-insensitive substrings.
    pub keywords: Vec<String>,

    /// Pattern fallthrough policy for amount and vendor extraction.
    pub match_policy: MatchPolicy,

    /// Separator placed between title, short body and expanded body.
    pub text_separator: String,

    /// Vendor label used when no merchant is found.
    pub default_vendor: String,

    /// Vendor names must be strictly longer than this.
    pub vendor_min_len: usize,

    /// Vendor names must be strictly shorter than this.
    pub vendor_max_len: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_TRANSACTION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            match_policy: MatchPolicy::FirstMatch,
            text_separator: " ".to_string(),
            default_vendor: UNKNOWN_MERCHANT.to_string(),
            vendor_min_len: 2,
            vendor_max_len: 50,
        }
    }
}

impl TxAlertConfig {
    /// Read, parse and validate a configuration file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> std::result::Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check that the configuration can drive a classifier.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.sources.allowlist.is_empty() {
            return Err(ConfigError::EmptyAllowlist);
        }
        self.classifier.validate()
    }
}

impl ClassifierConfig {
    /// Check keyword and vendor bound sanity.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.keywords.is_empty() {
            return Err(ConfigError::EmptyKeywords);
        }
        if let Some(pos) = self.keywords.iter().position(|k| k.trim().is_empty()) {
            return Err(ConfigError::BlankKeyword(pos));
        }
        // Exclusive bounds: min + 1 must still be below max.
        if self
            .vendor_min_len
            .checked_add(1)
            .is_none_or(|next| next >= self.vendor_max_len)
        {
            return Err(ConfigError::VendorBounds {
                min: self.vendor_min_len,
                max: self.vendor_max_len,
            });
        }
        Ok(())
    }
}
