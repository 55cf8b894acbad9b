//! Heuristic receipt parser: classification followed by field extraction.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::models::receipt::{ExtractedReceipt, VendorCategory};

use super::rules::{
    amounts::extract_amount, category::CategoryClassifier, dates::DateExtractor,
    times::TimeExtractor, FieldExtractor,
};

/// Which rule produced each field, `None` when the field was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules {
    pub date: Option<&'static str>,
    pub time: Option<&'static str>,
    pub amount: Option<&'static str>,
}

/// Result of receipt extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted receipt data.
    pub receipt: ExtractedReceipt,
    /// Raw recognized text.
    pub raw_text: String,
    /// Rules that fired for each field.
    pub rules: FieldRules,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for receipt parsing.
///
/// Parsing never fails: fields that cannot be located come back unresolved
/// and are judged later by the validator.
pub trait ReceiptParser {
    /// Parse one document's recognized text.
    fn parse(&self, source_id: &str, text: &str) -> ExtractionResult;
}

/// Rule-based parser for the supported receipt layouts.
pub struct HeuristicReceiptParser {
    classifier: CategoryClassifier,
    dates: DateExtractor,
    times: TimeExtractor,
}

impl HeuristicReceiptParser {
    /// Create a new parser with the default rule tables.
    pub fn new() -> Self {
        Self {
            classifier: CategoryClassifier::new(),
            dates: DateExtractor::new(),
            times: TimeExtractor::new(),
        }
    }
}

impl Default for HeuristicReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for HeuristicReceiptParser {
    fn parse(&self, source_id: &str, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();
        let mut rules = FieldRules::default();

        info!(source_id, chars = text.len(), "parsing receipt");
        debug!(source_id, "recognized text:\n{}", text);

        let category = self.classifier.classify(text);
        if category == VendorCategory::Unknown {
            warnings.push("Could not classify vendor".to_string());
        }

        let date = self.dates.extract(text).map(|m| {
            debug!(source_id, rule = m.rule, position = ?m.position, matched = %m.source, "date located");
            rules.date = Some(m.rule);
            m.value
        });
        if date.is_none() {
            warnings.push("Could not extract date".to_string());
        }

        let time = self.times.extract(text).map(|m| {
            debug!(source_id, rule = m.rule, position = ?m.position, matched = %m.source, "time located");
            rules.time = Some(m.rule);
            m.value
        });
        if time.is_none() {
            warnings.push("Could not extract time, using 00:00:00".to_string());
        }

        let amount = extract_amount(text, category).map(|m| {
            rules.amount = Some(m.rule);
            m.value
        });
        if amount.is_none() {
            warn!(source_id, %category, "could not extract amount");
            warnings.push("Could not extract amount".to_string());
        }

        debug!(
            source_id,
            %category,
            date_rule = rules.date,
            time_rule = rules.time,
            amount_rule = rules.amount,
            "extracted receipt fields"
        );

        ExtractionResult {
            receipt: ExtractedReceipt {
                source_id: source_id.to_string(),
                date,
                time,
                amount,
                category,
            },
            raw_text: text.to_string(),
            rules,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
