//! Vendor classification by ordered keyword rules.

use tracing::debug;

use crate::models::receipt::VendorCategory;

use super::{ExtractionMatch, FieldExtractor};

/// A signature term searched for in receipt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    /// ASCII term matched against the lower-cased text.
    Folded(&'static str),
    /// Hangul term or literal number, matched against the raw text.
    Exact(&'static str),
}

impl Term {
    fn text(&self) -> &'static str {
        match self {
            Term::Folded(t) | Term::Exact(t) => t,
        }
    }

    fn is_in(&self, raw: &str, lowered: &str) -> bool {
        match self {
            Term::Folded(t) => lowered.contains(t),
            Term::Exact(t) => raw.contains(t),
        }
    }
}

/// One classification rule: any of `terms` selects `category`.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: VendorCategory,
    pub terms: &'static [Term],
}

/// Classification rules, most specific first. The first match wins.
///
/// Card slips often print the merchant name too, so store signatures come
/// before issuer signatures, and the bare card-number prefix is consulted only
/// once every named signature has failed.
pub const RULES: &[CategoryRule] = &[
    CategoryRule {
        category: VendorCategory::CoffeeBean,
        terms: &[Term::Folded("coffee bean"), Term::Exact("커피빈")],
    },
    CategoryRule {
        category: VendorCategory::Starbucks,
        terms: &[Term::Folded("starbucks"), Term::Exact("스타벅스")],
    },
    CategoryRule {
        category: VendorCategory::ShinhanCard,
        terms: &[Term::Folded("deep on")],
    },
    CategoryRule {
        category: VendorCategory::HanaCard,
        terms: &[Term::Folded("hana card"), Term::Exact("하나카드")],
    },
    CategoryRule {
        category: VendorCategory::SamsungCard,
        terms: &[Term::Folded("samsung card"), Term::Exact("삼성카드")],
    },
    CategoryRule {
        category: VendorCategory::HanaCard,
        terms: &[Term::Exact("5181-85")],
    },
];

/// Vendor classifier over a fixed rule table.
pub struct CategoryClassifier {
    rules: &'static [CategoryRule],
}

impl CategoryClassifier {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    /// Classify text, falling back to [`VendorCategory::Unknown`].
    pub fn classify(&self, text: &str) -> VendorCategory {
        match self.extract(text) {
            Some(m) => {
                debug!(category = %m.value, term = %m.source, "classified receipt");
                m.value
            }
            None => {
                debug!("no vendor signature found, classified as unknown");
                VendorCategory::Unknown
            }
        }
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CategoryClassifier {
    type Output = ExtractionMatch<VendorCategory>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Every matching rule in priority order; the first term hit per rule is reported.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lowered = text.to_lowercase();

        self.rules
            .iter()
            .filter_map(|rule| {
                rule.terms
                    .iter()
                    .find(|term| term.is_in(text, &lowered))
                    .map(|term| ExtractionMatch::new(rule.category, "signature", term.text()))
            })
            .collect()
    }
}

/// Classify receipt text with the default rule table.
pub fn classify(text: &str) -> VendorCategory {
    CategoryClassifier::new().classify(text)
}
