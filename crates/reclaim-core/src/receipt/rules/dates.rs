//! Date extraction for receipts.

use regex::Captures;

use crate::models::receipt::ReceiptDate;

use super::patterns::{DATE_FULL_YEAR, DATE_SHORT_YEAR};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Four-digit years are preferred; two-digit years are read as 20xx. Values
/// are not checked against the calendar.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<ReceiptDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in DATE_FULL_YEAR.captures_iter(text) {
            if let Some(found) = to_date(&caps, 0).and_then(|d| to_match(&caps, d, "full_year")) {
                results.push(found);
            }
        }

        for caps in DATE_SHORT_YEAR.captures_iter(text) {
            if let Some(found) = to_date(&caps, 2000).and_then(|d| to_match(&caps, d, "short_year")) {
                results.push(found);
            }
        }

        results
    }
}

fn to_date(caps: &Captures<'_>, century: u16) -> Option<ReceiptDate> {
    let year: u16 = caps[1].parse().ok()?;
    let month: u8 = caps[2].parse().ok()?;
    let day: u8 = caps[3].parse().ok()?;
    Some(ReceiptDate::new(century + year, month, day))
}

fn to_match(caps: &Captures<'_>, date: ReceiptDate, rule: &'static str) -> Option<ExtractionMatch<ReceiptDate>> {
    let full_match = caps.get(0)?;
    Some(
        ExtractionMatch::new(date, rule, full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    )
}

/// Extract the receipt date, `None` when no pattern matches.
pub fn extract_date(text: &str) -> Option<ExtractionMatch<ReceiptDate>> {
    DateExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> Option<String> {
        extract_date(text).map(|m| m.value.to_string())
    }

    #[test]
    fn test_extract_date_separators() {
        assert_eq!(date("2024.01.15 12:00"), Some("2024-01-15".into()));
        assert_eq!(date("2024-1-5"), Some("2024-01-05".into()));
        assert_eq!(date("거래일 2024/03/09"), Some("2024-03-09".into()));
        assert_eq!(date("2024 03 09"), Some("2024-03-09".into()));
    }

    #[test]
    fn test_extract_date_korean_markers() {
        let m = extract_date("2024년 3월 7일 (목)").unwrap();
        assert_eq!(m.value, ReceiptDate::new(2024, 3, 7));
        assert_eq!(m.rule, "full_year");
        assert_eq!(m.source, "2024년 3월 7일");
    }

    #[test]
    fn test_two_digit_year() {
        let m = extract_date("판매일: 24.01.15").unwrap();
        assert_eq!(m.value, ReceiptDate::new(2024, 1, 15));
        assert_eq!(m.rule, "short_year");
    }

    #[test]
    fn test_full_year_wins_over_earlier_short_year() {
        let text = "영수번호 99-12-31\n일시 2024.02.20";
        assert_eq!(date(text), Some("2024-02-20".into()));
    }

    #[test]
    fn test_no_calendar_validation() {
        assert_eq!(date("2024.13.32"), Some("2024-13-32".into()));
    }

    #[test]
    fn test_date_not_found() {
        assert_eq!(date(""), None);
        assert_eq!(date("합계 12,000원"), None);
    }
}
