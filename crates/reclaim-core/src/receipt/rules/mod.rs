//! Rule-based field extractors for Korean payment receipts.

pub mod amounts;
pub mod category;
pub mod dates;
pub mod patterns;
pub mod times;

pub use amounts::{extract_amount, extract_amount_from_line, AmountStrategy};
pub use category::{classify, CategoryClassifier};
pub use dates::{extract_date, DateExtractor};
pub use times::{extract_time, TimeExtractor};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, in priority order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule or fallback step that fired.
    pub rule: &'static str,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Replace the rule name, e.g. when a fallback strategy produced the value.
    pub fn with_rule(mut self, rule: &'static str) -> Self {
        self.rule = rule;
        self
    }
}
