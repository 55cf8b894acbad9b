//! Extract command - fields from a single receipt.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;
use tracing::info;

use reclaim_core::models::config::ReclaimConfig;
use reclaim_core::ocr::{acquire_text, AcquirePolicy, TesseractEngine};
use reclaim_core::pipeline::source_id;
use reclaim_core::receipt::{ExtractionResult, HeuristicReceiptParser, ReceiptParser};
use reclaim_core::models::receipt::NOT_FOUND;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Receipt image
    #[arg(required = true)]
    input: PathBuf,

    /// Parse already recognized text from this file instead of running OCR
    #[arg(long)]
    text: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include the recognized text in the output
    #[arg(long)]
    show_text: bool,

    /// Convert the image to high-contrast grayscale before OCR
    #[arg(long)]
    preprocess: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, mut config: ReclaimConfig) -> anyhow::Result<()> {
    if args.preprocess {
        config.ocr.preprocess = true;
    }

    let text = match &args.text {
        Some(path) => fs::read_to_string(path)?,
        None => {
            if !args.input.exists() {
                anyhow::bail!("Input file not found: {}", args.input.display());
            }
            let engine = TesseractEngine::from_config(&config.ocr);
            acquire_text(&engine, &args.input, AcquirePolicy::from(&config.ocr)).await?
        }
    };

    info!("Processing file: {}", args.input.display());
    let result = HeuristicReceiptParser::new().parse(&source_id(&args.input), &text);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&to_json(&result, args.show_text))?,
        OutputFormat::Text => format_text(&result, args.show_text),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn to_json(result: &ExtractionResult, show_text: bool) -> serde_json::Value {
    let receipt = &result.receipt;
    let mut value = json!({
        "source_id": receipt.source_id,
        "category": receipt.category,
        "type": receipt.category.label(),
        "date": receipt.date.map(|d| d.to_string()),
        "time": receipt.time.map(|t| t.format("%H:%M:%S").to_string()),
        "amount": receipt.amount,
        "rules": {
            "date": result.rules.date,
            "time": result.rules.time,
            "amount": result.rules.amount,
        },
        "warnings": result.warnings,
        "processing_time_ms": result.processing_time_ms,
    });

    if show_text {
        value["raw_text"] = json!(result.raw_text);
    }
    value
}

fn format_text(result: &ExtractionResult, show_text: bool) -> String {
    let receipt = &result.receipt;
    let field = |value: Option<String>, rule: Option<&str>| match (value, rule) {
        (Some(value), Some(rule)) => format!("{value} ({rule})"),
        (Some(value), None) => value,
        (None, _) => NOT_FOUND.to_string(),
    };

    let mut output = String::new();
    output.push_str(&format!("File:   {}\n", receipt.source_id));
    output.push_str(&format!("Type:   {}\n", receipt.category));
    output.push_str(&format!(
        "Date:   {}\n",
        field(receipt.date.map(|d| d.to_string()), result.rules.date)
    ));
    output.push_str(&format!(
        "Time:   {}\n",
        field(
            receipt.time.map(|t| t.format("%H:%M:%S").to_string()),
            result.rules.time
        )
    ));
    output.push_str(&format!(
        "Amount: {}\n",
        field(receipt.amount.clone(), result.rules.amount)
    ));

    if !result.warnings.is_empty() {
        output.push('\n');
        output.push_str("Warnings:\n");
        for warning in &result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    if show_text {
        output.push_str("\nRecognized text:\n");
        output.push_str(&result.raw_text);
        output.push('\n');
    }

    output
}
