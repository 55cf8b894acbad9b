//! Run command - the full batch: extract, validate, number, select, report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::StreamExt;
use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use reclaim_core::error::{ReclaimError, ValidationError};
use reclaim_core::models::config::ReclaimConfig;
use reclaim_core::pipeline::{finalize, BatchOutcome, ReceiptPipeline};

use crate::report::{print_violations, write_report};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Directory containing receipt images
    #[arg(short, long)]
    image_dir: Option<PathBuf>,

    /// Output directory for the ledger report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reimbursement ceiling
    #[arg(long)]
    ceiling: Option<u64>,

    /// Smallest plausible amount
    #[arg(long)]
    min_amount: Option<u64>,

    /// Largest plausible amount
    #[arg(long)]
    max_amount: Option<u64>,

    /// Number of images recognized at once
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Convert images to high-contrast grayscale before OCR
    #[arg(long)]
    preprocess: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut ReclaimConfig) {
        if let Some(dir) = &self.image_dir {
            config.input.image_dir = dir.clone();
        }
        if let Some(dir) = &self.output {
            config.output.output_dir = dir.clone();
        }
        if let Some(ceiling) = self.ceiling {
            config.selection.ceiling = ceiling;
        }
        if let Some(min) = self.min_amount {
            config.validation.min_amount = min;
        }
        if let Some(max) = self.max_amount {
            config.validation.max_amount = max;
        }
        if let Some(jobs) = self.jobs {
            config.ocr.jobs = jobs;
        }
        if self.preprocess {
            config.ocr.preprocess = true;
        }
    }
}

pub async fn run(args: RunArgs, mut config: ReclaimConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    args.apply(&mut config);

    let files = discover_images(&config)?;
    if files.is_empty() {
        anyhow::bail!(
            "No receipt images found in {}",
            config.input.image_dir.display()
        );
    }

    println!(
        "{} Found {} receipt images",
        style("ℹ").blue(),
        files.len()
    );

    let outcome = extract_all(&files, &config).await?;

    if !outcome.failures.is_empty() {
        println!();
        println!("{}", style("Skipped (text acquisition failed):").yellow());
        for failure in &outcome.failures {
            println!("  - {}: {}", failure.source_id, failure.error);
        }
    }

    let report = match finalize(outcome.receipts(), &config) {
        Ok(report) => report,
        Err(ReclaimError::Validation(ValidationError::AmountsOutOfRange { min, max, violations })) => {
            print_violations(min, max, &violations);
            eprintln!("Check these images, fix them and run again. Nothing was selected.");
            anyhow::bail!("amount validation failed");
        }
        Err(e) => return Err(e.into()),
    };

    let summary_path = config.summary_path();
    write_report(&summary_path, &report.ledger.rows())?;
    info!(path = %summary_path.display(), "ledger report written");

    println!();
    println!(
        "{} Ledger written to {}",
        style("✓").green(),
        summary_path.display()
    );
    println!(
        "   Best sum: {} (ceiling {})",
        style(report.selection.total).green(),
        config.selection.ceiling
    );
    println!(
        "   Included: {} of {} receipts",
        report.selection.included.len(),
        report.ledger.len()
    );
    println!("   Excluded No.: {:?}", report.excluded_ids());

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Image files directly inside the configured directory, sorted by path.
fn discover_images(config: &ReclaimConfig) -> anyhow::Result<Vec<PathBuf>> {
    let dir = &config.input.image_dir;
    if !dir.is_dir() {
        anyhow::bail!("Image directory not found: {}", dir.display());
    }

    let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && config.input.accepts(p))
        .collect();
    files.sort();

    Ok(files)
}

async fn extract_all(files: &[PathBuf], config: &ReclaimConfig) -> anyhow::Result<BatchOutcome> {
    let pipeline = ReceiptPipeline::from_config(config);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} receipts {msg}")?
            .progress_chars("=>-"),
    );

    let mut outcome = BatchOutcome::default();
    let mut results = std::pin::pin!(pipeline.extract_stream(files));

    while let Some(result) = results.next().await {
        match result {
            Ok(extracted) => {
                pb.set_message(display_name(&extracted.receipt.source_id));
                outcome.extracted.push(extracted);
            }
            Err(failure) => outcome.failures.push(failure),
        }
        pb.inc(1);
    }

    pb.finish_with_message("done");
    Ok(outcome)
}

fn display_name(source_id: &str) -> String {
    Path::new(source_id)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
