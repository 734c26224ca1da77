//! Rule-based field extractors for banking notifications.

pub mod amounts;
pub mod keywords;
pub mod patterns;
pub mod vendor;

pub use amounts::{format_usd_amount, parse_usd_amount, AmountExtractor};
pub use keywords::KeywordGate;
pub use patterns::*;
pub use vendor::{normalize_vendor, VendorExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text, honoring pattern priority.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Every candidate match of every pattern, in priority order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A single pattern match together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value; `None` when the capture failed validation.
    pub value: Option<T>,
    /// Index of the pattern in its priority list.
    pub pattern: usize,
    /// Raw captured text.
    pub source: String,
    /// Byte span of the whole match in the searched text.
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: Option<T>, pattern: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            pattern,
            source: source.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Whether the capture produced a usable value.
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
}
