//! Merchant name extraction.

use regex::Captures;
use tracing::trace;

use super::patterns::{VENDOR_PATTERNS, WHITESPACE_RUN};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::config::MatchPolicy;

/// Vendor field extractor.
pub struct VendorExtractor {
    policy: MatchPolicy,
    /// Exclusive lower length bound.
    min_len: usize,
    /// Exclusive upper length bound.
    max_len: usize,
}

impl VendorExtractor {
    /// Create a new vendor extractor accepting names of 3 to 49 characters.
    pub fn new() -> Self {
        Self {
            policy: MatchPolicy::FirstMatch,
            min_len: 2,
            max_len: 50,
        }
    }

    /// Set the pattern fallthrough policy.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the exclusive length bounds for accepted names.
    pub fn with_length_bounds(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }

    fn accept(&self, raw: &str) -> Option<String> {
        let vendor = normalize_vendor(raw);
        let len = vendor.chars().count();
        (len > self.min_len && len < self.max_len).then_some(vendor)
    }

    fn to_match(&self, pattern: usize, caps: &Captures<'_>) -> Option<ExtractionMatch<String>> {
        let whole = caps.get(0)?;
        let raw = caps.get(1)?.as_str();

        Some(
            ExtractionMatch::new(self.accept(raw), pattern, raw)
                .with_position(whole.start(), whole.end()),
        )
    }
}

impl Default for VendorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        for (index, pattern) in VENDOR_PATTERNS.iter().enumerate() {
            let Some(found) = pattern
                .captures(text)
                .and_then(|caps| self.to_match(index, &caps))
            else {
                continue;
            };

            if !found.is_valid() {
                trace!("Rejected vendor candidate {:?} from pattern {}", found.source, index);
                if self.policy == MatchPolicy::FirstValid {
                    continue;
                }
            }
            return Some(found);
        }

        None
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        VENDOR_PATTERNS
            .iter()
            .enumerate()
            .flat_map(|(index, pattern)| {
                pattern
                    .captures_iter(text)
                    .filter_map(move |caps| self.to_match(index, &caps))
            })
            .collect()
    }
}

/// Trim a raw merchant capture and collapse internal whitespace runs.
pub fn normalize_vendor(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vendor(text: &str) -> Option<String> {
        VendorExtractor::new().extract(text).and_then(|m| m.value)
    }

    #[test]
    fn test_normalize_vendor() {
        assert_eq!(normalize_vendor("  Trader \t Joes\n"), "Trader Joes");
        assert_eq!(normalize_vendor("A&W"), "A&W");
    }

    #[test]
    fn test_terminated_capture() {
        assert_eq!(vendor("Purchase at Trader Joes for $45.23"), Some("Trader Joes".into()));
        assert_eq!(vendor("Card used @ Shell Oil on 03/02"), Some("Shell Oil".into()));
        assert_eq!(vendor("You spent $12.50 at Starbucks"), Some("Starbucks".into()));
        assert_eq!(vendor("Paid from Shell Oil USD 40.00"), Some("Shell Oil".into()));
        assert_eq!(vendor("Card at Blue Bottle charged today"), Some("Blue Bottle".into()));
        assert_eq!(vendor("Paid @ Target $5.00"), Some("Target".into()));
    }

    #[test]
    fn test_purchase_at_pattern() {
        // No terminator after the name, and a comma stops pattern 1.
        assert_eq!(
            vendor("Debit card purchase at Whole Foods Market, card ending 1234"),
            Some("Whole Foods Market".into())
        );
    }

    #[test]
    fn test_capitalized_name_before_amount() {
        assert_eq!(vendor("Netflix $15.49"), Some("Netflix".into()));
    }

    #[test]
    fn test_merchant_label() {
        assert_eq!(vendor("Merchant: Home Depot"), Some("Home Depot".into()));
        assert_eq!(vendor("merchant: A"), None);
    }

    #[test]
    fn test_rejected_match_stops_search() {
        // Pattern 1 captures "Al" (too short); the valid "Grocery Outlet"
        // from the merchant label is never consulted.
        let text = "Sent to Al for lunch. Merchant: Grocery Outlet";
        assert_eq!(vendor(text), None);

        let loose = VendorExtractor::new().with_policy(MatchPolicy::FirstValid);
        assert_eq!(
            loose.extract(text).and_then(|m| m.value),
            Some("Grocery Outlet".into())
        );
    }

    #[test]
    fn test_length_bounds_are_exclusive() {
        let long_name = "A".repeat(49);
        assert_eq!(vendor(&format!("merchant: {}", long_name)), Some(long_name));
        assert_eq!(vendor(&format!("merchant: {}", "B".repeat(50))), None);
        assert_eq!(vendor("merchant: Abc"), Some("Abc".into()));
        assert_eq!(vendor("merchant: Ab"), None);
    }
}
