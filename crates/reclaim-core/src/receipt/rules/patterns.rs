//! Common regex patterns for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Dates: 2024.01.15, 2024-1-5, 2024/01/15, 2024년 1월 15일, 2024 01 15
    pub static ref DATE_FULL_YEAR: Regex = Regex::new(
        r"(20[0-9]{2})[.\-/년\s]+([0-9]{1,2})[.\-/월\s]+([0-9]{1,2})일?"
    ).unwrap();

    // Two-digit year fallback: 24.01.15
    pub static ref DATE_SHORT_YEAR: Regex = Regex::new(
        r"([0-9]{2})[.\-/년\s]+([0-9]{1,2})[.\-/월\s]+([0-9]{1,2})일?"
    ).unwrap();

    // Keyword-anchored time: 승인시간 14:30:22, 거래일시 2024/01/15 14시 30분.
    // Seconds are `:SS` or `분 S초`; the two seconds groups are alternatives.
    pub static ref TIME_KEYWORD: Regex = Regex::new(
        r"(?:승인|결제|거래)[ \t]*(?:시간|시각|일시)[^\n]{0,24}?([0-9]{1,2})[ \t]*[:시][ \t]*([0-9]{1,2})(?::[ \t]*([0-9]{2})|[ \t]*분(?:[ \t]*([0-9]{1,2})[ \t]*초)?)?"
    ).unwrap();

    // 12-hour time with 오전/오후 markers: 오후 3시 15분, 오전 11:05
    pub static ref TIME_MERIDIEM: Regex = Regex::new(
        r"(오전|오후)[ \t]*([0-9]{1,2})[ \t]*[:시][ \t]*([0-9]{1,2})(?::[ \t]*([0-9]{2})|[ \t]*분(?:[ \t]*([0-9]{1,2})[ \t]*초)?)?"
    ).unwrap();

    pub static ref TIME_HMS: Regex = Regex::new(
        r"\b([0-9]{1,2}):([0-9]{2}):([0-9]{2})\b"
    ).unwrap();

    // Callers reject matches followed by ':' or a digit.
    pub static ref TIME_HM: Regex = Regex::new(
        r"\b([0-9]{1,2}):([0-9]{2})"
    ).unwrap();

    pub static ref TIME_KOREAN: Regex = Regex::new(
        r"([0-9]{1,2})[ \t]*시[ \t]*([0-9]{1,2})[ \t]*분(?:[ \t]*([0-9]{1,2})[ \t]*초)?"
    ).unwrap();

    // A number with optional ',' or '.' grouping separators.
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(
        r"[0-9][0-9,.]*[0-9]|[0-9]"
    ).unwrap();
}

/// Labels that precede the charged amount, highest priority first.
pub const AMOUNT_KEYWORDS: [&str; 5] = ["승인금액", "결제금액", "결제 금액", "합계", "승인 금액"];

/// Currency unit printed after amounts on card slips.
pub const CURRENCY_UNIT: &str = "원";

/// Card product line printed directly below the amount on Shinhan slips.
pub const SHINHAN_MARKER: &str = "deep on";

/// Values at or below this are store or terminal codes, not amounts.
pub const NOISE_THRESHOLD: u64 = 100;
