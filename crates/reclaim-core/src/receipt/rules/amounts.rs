//! Amount extraction for receipts.
//!
//! Each vendor family prints the charged amount differently, so the
//! classification picks one of a closed set of strategies.

use tracing::debug;

use crate::models::receipt::VendorCategory;

use super::patterns::{AMOUNT_KEYWORDS, CURRENCY_UNIT, NOISE_THRESHOLD, NUMERIC_TOKEN, SHINHAN_MARKER};
use super::ExtractionMatch;

/// How to locate the amount on a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountStrategy {
    /// Find the first line containing `marker`, then walk upward and take the
    /// first number greater than `min_value`.
    MarkerAbove { marker: &'static str, min_value: u64 },

    /// Collect every number suffixed with `unit` on its own line and take the
    /// largest; itemized sub-amounts are smaller than the total.
    UnitSuffixMax { unit: &'static str },

    /// Take the first number on the first line carrying a total label.
    Keyword,
}

impl AmountStrategy {
    /// Strategy used for a vendor family.
    pub fn for_category(category: VendorCategory) -> Self {
        match category {
            VendorCategory::ShinhanCard => Self::MarkerAbove {
                marker: SHINHAN_MARKER,
                min_value: NOISE_THRESHOLD,
            },
            VendorCategory::HanaCard | VendorCategory::SamsungCard => Self::UnitSuffixMax {
                unit: CURRENCY_UNIT,
            },
            VendorCategory::CoffeeBean | VendorCategory::Starbucks | VendorCategory::Unknown => {
                Self::Keyword
            }
        }
    }

    /// Rule name reported on matches produced by this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MarkerAbove { .. } => "marker_above",
            Self::UnitSuffixMax { .. } => "unit_suffix_max",
            Self::Keyword => "keyword",
        }
    }

    /// Run this strategy alone.
    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines: Vec<&str> = text.lines().collect();

        match *self {
            Self::MarkerAbove { marker, min_value } => marker_above(&lines, marker, min_value),
            Self::UnitSuffixMax { unit } => unit_suffix_max(&lines, unit),
            Self::Keyword => keyword(&lines),
        }
    }
}

fn marker_above(lines: &[&str], marker: &str, min_value: u64) -> Option<ExtractionMatch<String>> {
    let marker_index = lines
        .iter()
        .position(|line| line.to_lowercase().contains(marker))?;

    lines[..marker_index].iter().rev().find_map(|line| {
        let amount = extract_amount_from_line(line)?;
        // Only an overflowing digit string fails to parse; it is large, not noise.
        let above_noise = amount.parse::<u64>().map_or(true, |v| v > min_value);
        above_noise.then(|| ExtractionMatch::new(amount, "marker_above", line.trim()))
    })
}

fn unit_suffix_max(lines: &[&str], unit: &str) -> Option<ExtractionMatch<String>> {
    let mut best: Option<(u64, ExtractionMatch<String>)> = None;

    for line in lines {
        for token in NUMERIC_TOKEN.find_iter(line) {
            if !line[token.end()..].trim_start().starts_with(unit) {
                continue;
            }
            let Some(amount) = extract_amount_from_line(token.as_str()) else {
                continue;
            };
            let Ok(value) = amount.parse::<u64>() else {
                continue;
            };
            if best.as_ref().is_none_or(|(max, _)| value > *max) {
                best = Some((value, ExtractionMatch::new(amount, "unit_suffix_max", line.trim())));
            }
        }
    }

    best.map(|(_, m)| m)
}

fn keyword(lines: &[&str]) -> Option<ExtractionMatch<String>> {
    AMOUNT_KEYWORDS.iter().find_map(|keyword| {
        lines.iter().find_map(|line| {
            if !line.contains(keyword) {
                return None;
            }
            extract_amount_from_line(line)
                .map(|amount| ExtractionMatch::new(amount, "keyword", line.trim()))
        })
    })
}

/// Read the first number on a line, dropping `,` and `.` grouping separators.
///
/// There is no fractional currency: `12.500` reads as 12500.
pub fn extract_amount_from_line(line: &str) -> Option<String> {
    let token = NUMERIC_TOKEN.find(line)?;
    let digits: String = token.as_str().chars().filter(|c| *c != ',' && *c != '.').collect();

    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

/// Extract the amount using the strategy for `category`.
///
/// When a category-specific strategy finds nothing, the keyword strategy is
/// tried; such matches carry the rule name `keyword_fallback`.
pub fn extract_amount(text: &str, category: VendorCategory) -> Option<ExtractionMatch<String>> {
    let strategy = AmountStrategy::for_category(category);

    if let Some(found) = strategy.extract(text) {
        debug!(strategy = strategy.name(), amount = %found.value, "amount located");
        return Some(found);
    }

    if strategy == AmountStrategy::Keyword {
        debug!("no amount keyword found");
        return None;
    }

    let fallback = AmountStrategy::Keyword
        .extract(text)
        .map(|m| m.with_rule("keyword_fallback"));
    debug!(
        strategy = strategy.name(),
        found = fallback.is_some(),
        "strategy found nothing, fell back to amount keywords"
    );
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(text: &str, category: VendorCategory) -> Option<(String, &'static str)> {
        extract_amount(text, category).map(|m| (m.value, m.rule))
    }

    #[test]
    fn test_extract_amount_from_line() {
        assert_eq!(extract_amount_from_line("12,000"), Some("12000".into()));
        assert_eq!(extract_amount_from_line("합계 1.234.567원"), Some("1234567".into()));
        assert_eq!(extract_amount_from_line("TOTAL 4500"), Some("4500".into()));
        assert_eq!(extract_amount_from_line("승인금액 7"), Some("7".into()));
        assert_eq!(extract_amount_from_line("no digits here"), None);
    }

    #[test]
    fn test_decimal_point_read_as_grouping() {
        assert_eq!(extract_amount_from_line("12.50"), Some("1250".into()));
    }

    #[test]
    fn test_strategy_table_is_exhaustive() {
        for category in VendorCategory::ALL {
            let strategy = AmountStrategy::for_category(category);
            match category {
                VendorCategory::ShinhanCard => {
                    assert!(matches!(strategy, AmountStrategy::MarkerAbove { .. }))
                }
                VendorCategory::HanaCard | VendorCategory::SamsungCard => {
                    assert!(matches!(strategy, AmountStrategy::UnitSuffixMax { .. }))
                }
                _ => assert_eq!(strategy, AmountStrategy::Keyword),
            }
        }
    }

    #[test]
    fn test_marker_above_scans_upward() {
        let text = "신한카드 매출전표\n가맹점번호 0012\n34,500\n단말기 07\nDeep On Platinum\n합계 1,000";
        assert_eq!(
            amount(text, VendorCategory::ShinhanCard),
            Some(("34500".into(), "marker_above"))
        );
    }

    #[test]
    fn test_marker_above_skips_noise() {
        let text = "54,000\n단말기 07\nDEEP ON";
        assert_eq!(
            amount(text, VendorCategory::ShinhanCard),
            Some(("54000".into(), "marker_above"))
        );

        let text = "금액 100\nDEEP ON";
        assert_eq!(amount(text, VendorCategory::ShinhanCard), None);
    }

    #[test]
    fn test_marker_missing_falls_back_to_keywords() {
        let text = "신한카드\n승인금액 15,000원";
        assert_eq!(
            amount(text, VendorCategory::ShinhanCard),
            Some(("15000".into(), "keyword_fallback"))
        );
    }

    #[test]
    fn test_unit_suffix_takes_maximum() {
        let text = "하나카드\n아메리카노 4,500원\n케이크 6,800 원\n합계 11,300원\n포인트 113";
        assert_eq!(
            amount(text, VendorCategory::HanaCard),
            Some(("11300".into(), "unit_suffix_max"))
        );
    }

    #[test]
    fn test_unit_suffix_ignores_unsuffixed_numbers() {
        let text = "삼성카드\n카드번호 9410-12\n결제 23,000원\n승인번호 30012345";
        assert_eq!(
            amount(text, VendorCategory::SamsungCard),
            Some(("23000".into(), "unit_suffix_max"))
        );
    }

    #[test]
    fn test_keyword_priority_beats_line_order() {
        let text = "합계 9,000\n결제금액 8,100\n승인금액 8,100";
        assert_eq!(
            amount(text, VendorCategory::Starbucks),
            Some(("8100".into(), "keyword"))
        );

        let text = "합계 9,000\n결제 금액 7,200";
        assert_eq!(amount(text, VendorCategory::Unknown), Some(("7200".into(), "keyword")));
    }

    #[test]
    fn test_keyword_line_without_number_is_skipped() {
        let text = "승인금액\n12,000\n합계 12,000";
        assert_eq!(amount(text, VendorCategory::CoffeeBean), Some(("12000".into(), "keyword")));
    }

    #[test]
    fn test_amount_not_found() {
        assert_eq!(amount("", VendorCategory::Unknown), None);
        assert_eq!(amount("감사합니다", VendorCategory::HanaCard), None);
    }
}
