//! Regex patterns for banking notification extraction.
//!
//! Every pattern is compiled with Unicode mode off, so `\s`, `\d` and case
//! folding only cover ASCII. List order is priority order.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

fn ascii_regex(pattern: &str, case_insensitive: bool) -> Regex {
    RegexBuilder::new(pattern)
        .unicode(false)
        .case_insensitive(case_insensitive)
        .build()
        .unwrap()
}

lazy_static! {
    // Amount patterns (US format: 1,234.56); capture group 1 is the number.
    pub static ref AMOUNT_PATTERNS: Vec<Regex> = vec![
        // $123.45
        ascii_regex(r"\$([\d,]+\.\d{2})", false),
        // USD 123.45
        ascii_regex(r"USD\s*([\d,]+\.\d{2})", false),
        // 123.45 USD / 123.45 dollars
        ascii_regex(r"([\d,]+\.\d{2})\s*(?:USD|dollars?)", false),
        // spent $123.45 / purchase of 123.45
        ascii_regex(
            r"(?:charged|spent|paid|purchase|transaction)\s*(?:of)?\s*\$?([\d,]+\.\d{2})",
            true,
        ),
        // Total: $123.45
        ascii_regex(r"(?:amount|total)\s*:?\s*\$?([\d,]+\.\d{2})", true),
    ];

    // Vendor patterns; capture group 1 is the raw merchant name.
    pub static ref VENDOR_PATTERNS: Vec<Regex> = vec![
        // at Starbucks for / from Shell on / @ Target $ / ... at Starbucks<end>
        ascii_regex(
            r"(?:at|from|to|@)\s+([A-Za-z0-9\s&'.-]+?)(?:\s+(?:for|on|\$|USD|charged)|\s*$)",
            true,
        ),
        // purchase at Whole Foods Market
        ascii_regex(
            r"(?:purchase|transaction|payment)\s+(?:at|from)\s+([A-Za-z0-9\s&'.-]+)",
            true,
        ),
        // Starbucks $4.50
        ascii_regex(r"([A-Z][A-Za-z0-9\s&'.-]+?)\s+\$[\d,]+\.\d{2}", false),
        // Merchant: Home Depot
        ascii_regex(r"(?:merchant|vendor|store)\s*:?\s*([A-Za-z0-9\s&'.-]+)", true),
    ];

    pub static ref WHITESPACE_RUN: Regex = ascii_regex(r"\s+", false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert_eq!(AMOUNT_PATTERNS.len(), 5);
        assert_eq!(VENDOR_PATTERNS.len(), 4);
        assert!(WHITESPACE_RUN.is_match("a \t b"));
    }

    #[test]
    fn test_ascii_only_classes() {
        // Arabic-Indic digits and no-break spaces are not digits or whitespace here.
        assert!(!AMOUNT_PATTERNS[0].is_match("$١٢.٣٤"));
        assert!(!WHITESPACE_RUN.is_match("\u{00a0}"));
    }

    #[test]
    fn test_merchant_pattern_is_case_insensitive() {
        let caps = VENDOR_PATTERNS[3].captures("MERCHANT: Home Depot").unwrap();
        assert_eq!(&caps[1], "Home Depot");
    }
}
