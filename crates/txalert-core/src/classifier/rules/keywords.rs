//! Transaction keyword gate.

use crate::models::config::DEFAULT_TRANSACTION_KEYWORDS;

/// Decides whether text mentions a transaction at all.
///
/// Keywords match as lowercase substrings, so "paid" also hits "prepaid".
#[derive(Debug, Clone)]
pub struct KeywordGate {
    keywords: Vec<String>,
}

impl KeywordGate {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// First keyword found in `text`, in keyword list order.
    pub fn find(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn is_candidate(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordGate {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSACTION_KEYWORDS)
    }
}
