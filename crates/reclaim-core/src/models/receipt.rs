//! Receipt data models.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Rendering used for a date or amount that could not be located.
pub const NOT_FOUND: &str = "Not found";

/// Issuer or vendor family a receipt belongs to.
///
/// Decided once per document and used to pick the amount extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorCategory {
    /// Coffee Bean & Tea Leaf store receipt.
    CoffeeBean,
    /// Starbucks store receipt.
    Starbucks,
    /// Shinhan card slip; the card product line sits below the amount.
    ShinhanCard,
    /// Hana card slip.
    HanaCard,
    /// Samsung card slip.
    SamsungCard,
    /// Nothing matched.
    Unknown,
}

impl VendorCategory {
    /// All categories, in declaration order.
    pub const ALL: [VendorCategory; 6] = [
        Self::CoffeeBean,
        Self::Starbucks,
        Self::ShinhanCard,
        Self::HanaCard,
        Self::SamsungCard,
        Self::Unknown,
    ];

    /// Label written to the report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CoffeeBean => "커피빈",
            Self::Starbucks => "스타벅스",
            Self::ShinhanCard => "신한카드",
            Self::HanaCard => "하나카드",
            Self::SamsungCard => "삼성카드",
            Self::Unknown => "기타",
        }
    }
}

impl Default for VendorCategory {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for VendorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A calendar date as printed on the receipt.
///
/// Components are kept exactly as read; no calendar sanity check is applied,
/// so a misread day such as 32 survives extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReceiptDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl ReceiptDate {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for ReceiptDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Output of the extraction pipeline for one document, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReceipt {
    /// Original filename.
    pub source_id: String,

    /// Receipt date, `None` when unresolved.
    pub date: Option<ReceiptDate>,

    /// Time of day, `None` when unresolved (rendered as midnight).
    pub time: Option<NaiveTime>,

    /// Digits-only amount, `None` when not found.
    pub amount: Option<String>,

    /// Vendor family.
    pub category: VendorCategory,
}

impl ExtractedReceipt {
    /// Amount coerced to an integer; anything non-numeric becomes 0.
    pub fn coerced_amount(&self) -> u64 {
        self.amount
            .as_deref()
            .and_then(|a| a.parse().ok())
            .unwrap_or(0)
    }
}

/// A receipt whose amount has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub source_id: String,
    pub date: Option<ReceiptDate>,
    pub time: Option<NaiveTime>,
    pub amount: u64,
    pub category: VendorCategory,
}

impl ReceiptRecord {
    /// Date as written to the report.
    pub fn date_display(&self) -> String {
        self.date
            .map(|d| d.to_string())
            .unwrap_or_else(|| NOT_FOUND.to_string())
    }

    /// Time as written to the report; unresolved renders as `00:00:00`.
    pub fn time_display(&self) -> String {
        self.time
            .unwrap_or(NaiveTime::MIN)
            .format("%H:%M:%S")
            .to_string()
    }

    /// Chronological order with unresolved dates, then unresolved times, last.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        let key = |r: &Self| (r.date.is_none(), r.date, r.time.is_none(), r.time);
        key(self).cmp(&key(other))
    }
}
