//! Ledger assembly: validated receipts in chronological order with dense
//! sequence numbers.

mod validator;

pub use validator::AmountValidator;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::receipt::ReceiptRecord;
use crate::selection::{SelectionItem, SelectionResult};

/// Report value for a receipt left out of the submission.
pub const EXCLUDED: &str = "Y";
/// Report value for a receipt included in the submission.
pub const INCLUDED: &str = "N";

/// A numbered receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Sequence number, 1-based.
    pub no: u32,
    pub record: ReceiptRecord,
    /// Set once a selection has been applied.
    pub excluded: bool,
}

/// Sorted, numbered receipts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Sort records by (date, time) and number them 1..=N.
    ///
    /// Unresolved dates sort after every resolved one, unresolved times after
    /// resolved times on the same date. The sort is stable, so ties keep
    /// discovery order.
    pub fn build(mut records: Vec<ReceiptRecord>) -> Self {
        records.sort_by(|a, b| a.chronological_cmp(b));

        let entries: Vec<LedgerEntry> = records
            .into_iter()
            .zip(1..)
            .map(|(record, no)| LedgerEntry {
                no,
                record,
                excluded: false,
            })
            .collect();

        info!(count = entries.len(), "ledger numbered");
        Self { entries }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All sequence numbers.
    pub fn ids(&self) -> BTreeSet<u32> {
        self.entries.iter().map(|e| e.no).collect()
    }

    /// Items for the selection engine, in ledger order.
    pub fn selection_items(&self) -> Vec<SelectionItem> {
        self.entries
            .iter()
            .map(|e| SelectionItem::new(e.no, e.record.amount))
            .collect()
    }

    /// Mark every entry not chosen by `selection` as excluded.
    pub fn apply_selection(&mut self, selection: &SelectionResult) {
        for entry in &mut self.entries {
            entry.excluded = !selection.is_included(entry.no);
        }
    }

    /// Rows handed to the report writer.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.entries.iter().map(ReportRow::from).collect()
    }
}

/// One report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "No.")]
    pub no: u32,
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time", default)]
    pub time: String,
    #[serde(rename = "Amount")]
    pub amount: u64,
    #[serde(rename = "Type")]
    pub category: String,
    #[serde(rename = "제외유무", default)]
    pub excluded: String,
}

impl From<&LedgerEntry> for ReportRow {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            no: entry.no,
            filename: entry.record.source_id.clone(),
            date: entry.record.date_display(),
            time: entry.record.time_display(),
            amount: entry.record.amount,
            category: entry.record.category.label().to_string(),
            excluded: if entry.excluded { EXCLUDED } else { INCLUDED }.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::{ReceiptDate, VendorCategory};
    use crate::selection::SubsetSelector;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    fn record(source_id: &str, date: Option<(u16, u8, u8)>, time: Option<(u32, u32)>, amount: u64) -> ReceiptRecord {
        ReceiptRecord {
            source_id: source_id.into(),
            date: date.map(|(y, m, d)| ReceiptDate::new(y, m, d)),
            time: time.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            amount,
            category: VendorCategory::Unknown,
        }
    }

    fn order(ledger: &Ledger) -> Vec<&str> {
        ledger.entries().iter().map(|e| e.record.source_id.as_str()).collect()
    }

    #[test]
    fn test_build_sorts_chronologically() {
        let ledger = Ledger::build(vec![
            record("undated.jpg", None, Some((9, 0)), 1000),
            record("late.jpg", Some((2024, 3, 2)), Some((18, 0)), 2000),
            record("untimed.jpg", Some((2024, 3, 1)), None, 3000),
            record("early.jpg", Some((2024, 3, 1)), Some((8, 30)), 4000),
        ]);

        assert_eq!(order(&ledger), vec!["early.jpg", "untimed.jpg", "late.jpg", "undated.jpg"]);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let ledger = Ledger::build(vec![
            record("b.jpg", Some((2024, 1, 1)), None, 1000),
            record("a.jpg", Some((2024, 1, 1)), None, 1000),
            record("c.jpg", None, None, 1000),
            record("d.jpg", None, None, 1000),
        ]);

        assert_eq!(order(&ledger), vec!["b.jpg", "a.jpg", "c.jpg", "d.jpg"]);
    }

    #[test]
    fn test_sequence_numbers_are_dense() {
        let records = (0..7)
            .map(|i| record(&format!("{i}.jpg"), Some((2024, 1, 7 - i as u8)), None, 1000))
            .collect();
        let ledger = Ledger::build(records);

        assert_eq!(ledger.ids(), (1..=7).collect::<BTreeSet<u32>>());
        let numbers: Vec<_> = ledger.entries().iter().map(|e| e.no).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = Ledger::build(Vec::new());
        assert!(ledger.is_empty());
        assert!(ledger.rows().is_empty());
    }

    #[test]
    fn test_apply_selection_marks_rows() {
        let mut ledger = Ledger::build(vec![
            record("a.jpg", Some((2024, 1, 1)), None, 5000),
            record("b.jpg", Some((2024, 1, 2)), Some((13, 5)), 7000),
            record("c.jpg", None, None, 12_000),
        ]);
        let selection = SubsetSelector::new(15_000).select(&ledger.selection_items());
        ledger.apply_selection(&selection);

        let rows = ledger.rows();
        assert_eq!(
            rows[1],
            ReportRow {
                no: 2,
                filename: "b.jpg".into(),
                date: "2024-01-02".into(),
                time: "13:05:00".into(),
                amount: 7000,
                category: "기타".into(),
                excluded: "Y".into(),
            }
        );
        let flags: Vec<_> = rows.iter().map(|r| r.excluded.as_str()).collect();
        assert_eq!(flags, vec!["Y", "Y", "N"]);
        assert_eq!(rows[2].date, "Not found");
        assert_eq!(rows[2].time, "00:00:00");
    }
}
