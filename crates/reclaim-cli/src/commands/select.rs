//! Select command - re-run the budget selection over an existing ledger CSV.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use reclaim_core::error::ValidationError;
use reclaim_core::ledger::{AmountValidator, EXCLUDED, INCLUDED};
use reclaim_core::models::config::ReclaimConfig;
use reclaim_core::selection::{SelectionItem, SelectionResult, SubsetSelector};

use crate::report::{print_violations, read_csv_text, UTF8_BOM};

const NO_COLUMN: &str = "No.";
const FILENAME_COLUMN: &str = "Filename";
const AMOUNT_COLUMN: &str = "Amount";
const EXCLUDED_COLUMN: &str = "제외유무";

/// Arguments for the select command.
#[derive(Args)]
pub struct SelectArgs {
    /// Ledger CSV with `No.` and `Amount` columns
    #[arg(required = true)]
    ledger: PathBuf,

    /// Reimbursement ceiling
    #[arg(long)]
    ceiling: Option<u64>,

    /// Write the exclusion column back into the ledger file
    #[arg(long)]
    write: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

/// A ledger file held as raw records so unrelated columns survive a rewrite.
struct LedgerFile {
    headers: csv::StringRecord,
    records: Vec<csv::StringRecord>,
    no_index: usize,
    amount_index: usize,
    filename_index: Option<usize>,
}

impl LedgerFile {
    fn read(text: &str) -> anyhow::Result<Self> {
        let mut rdr = csv::Reader::from_reader(text.as_bytes());
        let headers = rdr.headers()?.clone();

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| anyhow::anyhow!("Ledger has no `{}` column", name))
        };
        let no_index = column(NO_COLUMN)?;
        let amount_index = column(AMOUNT_COLUMN)?;
        let filename_index = column(FILENAME_COLUMN).ok();

        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            headers,
            records,
            no_index,
            amount_index,
            filename_index,
        })
    }

    fn items(&self) -> anyhow::Result<Vec<SelectionItem>> {
        self.records
            .iter()
            .enumerate()
            .map(|(line, record)| -> anyhow::Result<SelectionItem> {
                let field = |index: usize, name: &str| {
                    record
                        .get(index)
                        .map(str::trim)
                        .ok_or_else(|| anyhow::anyhow!("Row {} has no `{}` value", line + 1, name))
                };
                let no = field(self.no_index, NO_COLUMN)?;
                let amount = field(self.amount_index, AMOUNT_COLUMN)?;

                let no: u32 = no
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Row {}: invalid No. `{}`", line + 1, no))?;
                let amount: u64 = amount
                    .replace(',', "")
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Row {}: invalid amount `{}`", line + 1, amount))?;

                Ok(SelectionItem::new(no, amount))
            })
            .collect()
    }

    /// Row labels paired with amounts, for range validation.
    fn labeled_amounts<'a>(&'a self, items: &'a [SelectionItem]) -> impl Iterator<Item = (String, u64)> + 'a {
        self.records.iter().zip(items).map(move |(record, item)| {
            let filename = self
                .filename_index
                .and_then(|index| record.get(index))
                .map(str::trim)
                .filter(|name| !name.is_empty());
            let label = match filename {
                Some(name) => format!("No. {} {}", item.id, name),
                None => format!("No. {}", item.id),
            };
            (label, item.amount)
        })
    }

    /// Records with the exclusion column set from `selection`, appended if absent.
    fn marked(&self, selection: &SelectionResult, items: &[SelectionItem]) -> (csv::StringRecord, Vec<csv::StringRecord>) {
        let existing = self.headers.iter().position(|h| h.trim() == EXCLUDED_COLUMN);

        let mut headers = self.headers.clone();
        if existing.is_none() {
            headers.push_field(EXCLUDED_COLUMN);
        }

        let records = self
            .records
            .iter()
            .zip(items)
            .map(|(record, item)| {
                let flag = if selection.is_included(item.id) { INCLUDED } else { EXCLUDED };
                match existing {
                    Some(index) => record
                        .iter()
                        .enumerate()
                        .map(|(i, value)| if i == index { flag } else { value })
                        .collect(),
                    None => {
                        let mut record = record.clone();
                        record.push_field(flag);
                        record
                    }
                }
            })
            .collect();

        (headers, records)
    }
}

/// Sequence numbers must be exactly `1..=N` with no repeats.
fn check_numbering(items: &[SelectionItem]) -> anyhow::Result<()> {
    let mut seen = BTreeSet::new();
    let repeated: BTreeSet<u32> = items
        .iter()
        .filter(|item| !seen.insert(item.id))
        .map(|item| item.id)
        .collect();
    if !repeated.is_empty() {
        anyhow::bail!("Ledger repeats No. {:?}", repeated);
    }

    let count = items.len() as u32;
    let missing: Vec<u32> = (1..=count).filter(|id| !seen.contains(id)).collect();
    if !missing.is_empty() {
        anyhow::bail!(
            "Ledger numbering must run from 1 to {}; missing No. {:?}",
            count,
            missing
        );
    }
    Ok(())
}

pub fn run(args: SelectArgs, mut config: ReclaimConfig) -> anyhow::Result<()> {
    if let Some(ceiling) = args.ceiling {
        config.selection.ceiling = ceiling;
    }
    if config.selection.ceiling == 0 {
        anyhow::bail!("Ceiling must be positive");
    }

    let ledger = LedgerFile::read(&read_csv_text(&args.ledger)?)?;
    let items = ledger.items()?;
    check_numbering(&items)?;

    let validator = AmountValidator::from_config(&config.validation)?;
    match validator.check(ledger.labeled_amounts(&items)) {
        Ok(()) => {}
        Err(ValidationError::AmountsOutOfRange { min, max, violations }) => {
            print_violations(min, max, &violations);
            eprintln!("Fix these rows and run again. Nothing was selected.");
            anyhow::bail!("amount validation failed");
        }
        Err(e) => return Err(e.into()),
    }

    let selection = SubsetSelector::new(config.selection.ceiling).select(&items);
    let excluded = selection.excluded(items.iter().map(|item| item.id));
    info!(
        receipts = items.len(),
        total = selection.total,
        ceiling = config.selection.ceiling,
        "selection computed"
    );

    if args.write {
        let (headers, records) = ledger.marked(&selection, &items);

        let mut buffer = UTF8_BOM.to_vec();
        {
            let mut wtr = csv::Writer::from_writer(&mut buffer);
            wtr.write_record(&headers)?;
            for record in &records {
                wtr.write_record(record)?;
            }
            wtr.flush()?;
        }
        fs::write(&args.ledger, buffer)?;
    }

    if args.json {
        let value = serde_json::json!({
            "ceiling": config.selection.ceiling,
            "total": selection.total,
            "included": selection.included,
            "excluded": excluded,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{} Best sum: {} (ceiling {})",
        style("✓").green(),
        selection.total,
        config.selection.ceiling
    );
    println!("   Included No.: {:?}", selection.included);
    println!("   Excluded No.: {:?}", excluded);
    if args.write {
        println!(
            "{} Updated {} in {}",
            style("✓").green(),
            EXCLUDED_COLUMN,
            args.ledger.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER: &str = "No.,Filename,Amount\n1,a.jpg,5000\n2,b.jpg,\"7,000\"\n3,c.jpg,12000\n";

    #[test]
    fn test_read_ledger_items() {
        let ledger = LedgerFile::read(LEDGER).unwrap();
        let items = ledger.items().unwrap();
        assert_eq!(
            items,
            vec![
                SelectionItem::new(1, 5000),
                SelectionItem::new(2, 7000),
                SelectionItem::new(3, 12000),
            ]
        );
    }

    #[test]
    fn test_missing_amount_column() {
        let err = LedgerFile::read("No.,Filename\n1,a.jpg\n").err().unwrap();
        assert!(err.to_string().contains("Amount"));
    }

    #[test]
    fn test_numbering_rejects_repeats() {
        let ledger = LedgerFile::read("No.,Amount\n1,5000\n1,7000\n").unwrap();
        let err = check_numbering(&ledger.items().unwrap()).unwrap_err();
        assert!(err.to_string().contains("repeats No. {1}"));
    }

    #[test]
    fn test_numbering_rejects_gaps() {
        let ledger = LedgerFile::read("No.,Amount\n1,5000\n3,7000\n").unwrap();
        let err = check_numbering(&ledger.items().unwrap()).unwrap_err();
        assert!(err.to_string().contains("missing No. [2]"));
    }

    #[test]
    fn test_numbering_accepts_any_row_order() {
        let ledger = LedgerFile::read("No.,Amount\n2,5000\n1,7000\n").unwrap();
        assert!(check_numbering(&ledger.items().unwrap()).is_ok());
    }

    #[test]
    fn test_out_of_range_rows_are_all_reported() {
        let text = "No.,Filename,Amount\n1,a.jpg,0\n2,b.jpg,500\n3,c.jpg,250000\n4,d.jpg,5000\n";
        let ledger = LedgerFile::read(text).unwrap();
        let items = ledger.items().unwrap();

        let err = AmountValidator::default()
            .check(ledger.labeled_amounts(&items))
            .unwrap_err();
        let ValidationError::AmountsOutOfRange { violations, .. } = err else {
            panic!("expected range violation");
        };
        let labels: Vec<_> = violations.iter().map(|v| v.source_id.as_str()).collect();
        assert_eq!(labels, vec!["No. 1 a.jpg", "No. 2 b.jpg", "No. 3 c.jpg"]);
    }

    #[test]
    fn test_marked_appends_column() {
        let ledger = LedgerFile::read(LEDGER).unwrap();
        let items = ledger.items().unwrap();
        let selection = SubsetSelector::new(15_000).select(&items);

        let (headers, records) = ledger.marked(&selection, &items);
        assert_eq!(headers.get(3), Some("제외유무"));
        let flags: Vec<_> = records.iter().map(|r| r.get(3).unwrap().to_string()).collect();
        assert_eq!(flags, vec!["Y", "Y", "N"]);
    }

    #[test]
    fn test_marked_replaces_existing_column() {
        let text = "No.,Amount,제외유무\n1,5000,N\n2,3000,Y\n";
        let ledger = LedgerFile::read(text).unwrap();
        let items = ledger.items().unwrap();
        let selection = SubsetSelector::new(10_000).select(&items);

        let (headers, records) = ledger.marked(&selection, &items);
        assert_eq!(headers.len(), 3);
        let flags: Vec<_> = records.iter().map(|r| r.get(2).unwrap().to_string()).collect();
        assert_eq!(flags, vec!["N", "N"]);
    }
}
