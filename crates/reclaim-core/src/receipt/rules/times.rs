//! Time-of-day extraction for receipts.

use chrono::NaiveTime;
use regex::{Captures, Regex};

use super::patterns::{TIME_HM, TIME_HMS, TIME_KEYWORD, TIME_KOREAN, TIME_MERIDIEM};
use super::{ExtractionMatch, FieldExtractor};

/// Time field extractor.
///
/// Strategies are tried in a fixed order and the first one yielding an
/// in-range time wins:
///
/// 1. `keyword`: 승인/결제/거래 시간 followed closely by a time
/// 2. `meridiem`: 오전/오후 with a 12-hour clock value
/// 3. `hms`: bare `HH:MM:SS`
/// 4. `hm`: bare `HH:MM` not followed by another `:` or digit
/// 5. `korean`: `H시 M분[ S초]`
pub struct TimeExtractor;

impl TimeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TimeExtractor {
    type Output = ExtractionMatch<NaiveTime>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        keyword_times(text)
            .next()
            .or_else(|| meridiem_times(text).next())
            .or_else(|| clock_times(&TIME_HMS, "hms", text).next())
            .or_else(|| hour_minute_times(text).next())
            .or_else(|| clock_times(&TIME_KOREAN, "korean", text).next())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        keyword_times(text)
            .chain(meridiem_times(text))
            .chain(clock_times(&TIME_HMS, "hms", text))
            .chain(hour_minute_times(text))
            .chain(clock_times(&TIME_KOREAN, "korean", text))
            .collect()
    }
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    match caps.get(group) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0),
    }
}

/// Hour and minute from groups `first` and `first + 1`. Seconds come from
/// whichever of `first + 2` (`:SS`) or `first + 3` (`S초`) participated.
fn hms(caps: &Captures<'_>, first: usize) -> Option<(u32, u32, u32)> {
    let seconds = if caps.get(first + 2).is_some() { first + 2 } else { first + 3 };
    Some((number(caps, first)?, number(caps, first + 1)?, number(caps, seconds)?))
}

fn to_match(caps: &Captures<'_>, time: NaiveTime, rule: &'static str) -> Option<ExtractionMatch<NaiveTime>> {
    let full_match = caps.get(0)?;
    Some(
        ExtractionMatch::new(time, rule, full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    )
}

fn keyword_times(text: &str) -> impl Iterator<Item = ExtractionMatch<NaiveTime>> + '_ {
    clock_times(&TIME_KEYWORD, "keyword", text)
}

/// 24-hour clock matches with hour, minute and optional second in groups 1..=3.
fn clock_times<'t>(
    pattern: &'t Regex,
    rule: &'static str,
    text: &'t str,
) -> impl Iterator<Item = ExtractionMatch<NaiveTime>> + 't {
    pattern.captures_iter(text).filter_map(move |caps| {
        let (h, m, s) = hms(&caps, 1)?;
        let time = NaiveTime::from_hms_opt(h, m, s)?;
        to_match(&caps, time, rule)
    })
}

fn meridiem_times(text: &str) -> impl Iterator<Item = ExtractionMatch<NaiveTime>> + '_ {
    TIME_MERIDIEM.captures_iter(text).filter_map(|caps| {
        let (h, m, s) = hms(&caps, 2)?;
        let hour = to_24_hour(&caps[1] == "오후", h)?;
        let time = NaiveTime::from_hms_opt(hour, m, s)?;
        to_match(&caps, time, "meridiem")
    })
}

/// 12-hour to 24-hour clock: 12 PM stays 12, 12 AM becomes 0.
fn to_24_hour(afternoon: bool, hour: u32) -> Option<u32> {
    if hour > 12 {
        return None;
    }
    Some(match (afternoon, hour) {
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, 12) => 0,
        (false, h) => h,
    })
}

fn hour_minute_times(text: &str) -> impl Iterator<Item = ExtractionMatch<NaiveTime>> + '_ {
    TIME_HM.captures_iter(text).filter_map(move |caps| {
        let end = caps.get(0)?.end();
        if text[end..].starts_with(|c: char| c == ':' || c.is_ascii_digit()) {
            return None;
        }
        let h: u32 = caps[1].parse().ok()?;
        let m: u32 = caps[2].parse().ok()?;
        let time = NaiveTime::from_hms_opt(h, m, 0)?;
        to_match(&caps, time, "hm")
    })
}

/// Extract the receipt time, `None` when every strategy fails.
pub fn extract_time(text: &str) -> Option<ExtractionMatch<NaiveTime>> {
    TimeExtractor::new().extract(text)
}
