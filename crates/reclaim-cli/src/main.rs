//! CLI application for building a reimbursement ledger from receipt photos.

mod commands;
mod logging;
mod report;

use clap::{Parser, Subcommand};
use reclaim_core::models::config::ReclaimConfig;

use commands::{config, extract, run, select};

/// Receipt OCR - build a numbered ledger and pick receipts under a budget
#[derive(Parser)]
#[command(name = "reclaim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, validate, number and select a folder of receipts
    Run(run::RunArgs),

    /// Extract fields from a single receipt
    Extract(extract::ExtractArgs),

    /// Re-run selection over an existing ledger CSV
    Select(select::SelectArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_file = cli.config.as_deref();

    // The config subcommand must work even when the file does not parse.
    let setup = || -> anyhow::Result<ReclaimConfig> {
        let config = commands::load_config(config_file)?;
        logging::init(cli.verbose, config.logging.log_dir.as_deref())?;
        Ok(config)
    };

    match cli.command {
        Commands::Run(args) => run::run(args, setup()?).await,
        Commands::Extract(args) => extract::run(args, setup()?).await,
        Commands::Select(args) => select::run(args, setup()?),
        Commands::Config(args) => {
            logging::init(cli.verbose, None)?;
            config::run(args, config_file)
        }
    }
}
