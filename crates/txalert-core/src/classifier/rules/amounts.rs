//! Amount extraction for banking notifications.

use regex::Captures;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use super::patterns::AMOUNT_PATTERNS;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::config::MatchPolicy;

/// Amount field extractor.
pub struct AmountExtractor {
    policy: MatchPolicy,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            policy: MatchPolicy::FirstMatch,
        }
    }

    /// Set the pattern fallthrough policy.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn to_match(pattern: usize, caps: &Captures<'_>) -> Option<ExtractionMatch<Decimal>> {
        let whole = caps.get(0)?;
        let number = caps.get(1)?.as_str();

        Some(
            ExtractionMatch::new(parse_usd_amount(number), pattern, number)
                .with_position(whole.start(), whole.end()),
        )
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        for (index, pattern) in AMOUNT_PATTERNS.iter().enumerate() {
            let Some(found) = pattern
                .captures(text)
                .and_then(|caps| Self::to_match(index, &caps))
            else {
                continue;
            };

            if !found.is_valid() {
                warn!("Failed to parse amount: {}", found.source);
                if self.policy == MatchPolicy::FirstValid {
                    continue;
                }
            }
            return Some(found);
        }

        None
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AMOUNT_PATTERNS
            .iter()
            .enumerate()
            .flat_map(|(index, pattern)| {
                pattern
                    .captures_iter(text)
                    .filter_map(move |caps| Self::to_match(index, &caps))
            })
            .collect()
    }
}

/// Parse a US-formatted amount (e.g. "1,234.56").
///
/// Comma separators are dropped wherever they appear. Returns `None` when
/// nothing numeric remains or the value does not fit a `Decimal`.
pub fn parse_usd_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.replace(',', "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return None;
    }

    // ".50" is a valid amount of fifty cents.
    if cleaned.starts_with('.') {
        return Decimal::from_str(&format!("0{}", cleaned)).ok();
    }

    Decimal::from_str(cleaned).ok()
}

/// Format amount in US style ($1,234.56).
pub fn format_usd_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some(parts) => parts,
        None => return format!("${}", s),
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn amount(text: &str) -> Option<Decimal> {
        AmountExtractor::new().extract(text).and_then(|m| m.value)
    }

    #[test]
    fn test_parse_usd_amount() {
        assert_eq!(parse_usd_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_usd_amount("12,345,678.90"), Some(dec("12345678.90")));
        assert_eq!(parse_usd_amount("9.99"), Some(dec("9.99")));
        assert_eq!(parse_usd_amount(",.50"), Some(dec("0.50")));
        assert_eq!(parse_usd_amount(",,,"), None);
        assert_eq!(parse_usd_amount("0012.50"), Some(dec("12.50")));
        // Beyond the Decimal range: no amount rather than a rounded one.
        assert_eq!(parse_usd_amount("99999999999999999999999999999999.00"), None);
    }

    #[test]
    fn test_format_usd_amount() {
        assert_eq!(format_usd_amount(dec("1234.56")), "$1,234.56");
        assert_eq!(format_usd_amount(dec("12345678.9")), "$12,345,678.90");
        assert_eq!(format_usd_amount(dec("0.5")), "$0.50");
        assert_eq!(format_usd_amount(dec("-42")), "-$42.00");
    }

    #[test]
    fn test_pattern_priority() {
        assert_eq!(amount("$1,234.56 charged at Foo"), Some(dec("1234.56")));
        assert_eq!(amount("USD 42.00 purchase"), Some(dec("42.00")));
        assert_eq!(amount("A charge of 17.25 dollars was made"), Some(dec("17.25")));
        assert_eq!(amount("Purchase of 88.10 approved"), Some(dec("88.10")));
        assert_eq!(amount("total: $9.99"), Some(dec("9.99")));
        assert_eq!(amount("Amount 3.10"), Some(dec("3.10")));
        assert_eq!(amount("You were charged 7 dollars"), None);
    }

    #[test]
    fn test_dollar_sign_beats_earlier_keyword_amount() {
        // Pattern 1 wins even though pattern 4 matches earlier in the text.
        let found = AmountExtractor::new()
            .extract("Spent 5.00 then paid $7.00")
            .unwrap();

        assert_eq!(found.pattern, 0);
        assert_eq!(found.value, Some(dec("7.00")));
    }

    #[test]
    fn test_unparseable_capture_stops_search() {
        let text = "$99999999999999999999999999999999.00 or total 5.00";

        assert_eq!(amount(text), None);

        let loose = AmountExtractor::new().with_policy(MatchPolicy::FirstValid);
        assert_eq!(loose.extract(text).and_then(|m| m.value), Some(dec("5.00")));
    }

    #[test]
    fn test_extract_all_amounts() {
        let extractor = AmountExtractor::new();
        let results = extractor.extract_all("Paid $10.00 and $2,500.00");

        // Two from the dollar pattern, one from the verb pattern.
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].position, Some((5, 11)));
        assert!(results.iter().all(|m| m.is_valid()));
    }
}
