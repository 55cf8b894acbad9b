//! Ledger CSV reading and writing.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use console::style;
use reclaim_core::error::AmountViolation;
use reclaim_core::ReportRow;

/// Written first so spreadsheet tools detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Report columns, in order.
pub const HEADERS: [&str; 7] = ["No.", "Filename", "Date", "Time", "Amount", "Type", "제외유무"];

/// Write the ledger report, creating parent directories as needed.
pub fn write_report(path: &Path, rows: &[ReportRow]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    wtr.write_record(HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(())
}

/// List every amount outside `[min, max]` on stderr.
pub fn print_violations(min: u64, max: u64, violations: &[AmountViolation]) {
    eprintln!();
    eprintln!(
        "{} {} receipt(s) have amounts outside [{}, {}]:",
        style("✗").red(),
        violations.len(),
        min,
        max
    );
    for violation in violations {
        eprintln!("  - {}", violation);
    }
}

/// Read a CSV file as text, dropping a leading BOM.
pub fn read_csv_text(path: &Path) -> anyhow::Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(content))
}
