//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use reclaim_core::models::config::ReclaimConfig;

use super::config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "selection.ceiling")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

/// Run a config subcommand against `--config`, or the per-user file.
pub fn run(args: ConfigArgs, explicit: Option<&str>) -> anyhow::Result<()> {
    let path = config_path(explicit);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<ReclaimConfig> {
    if path.exists() {
        Ok(ReclaimConfig::from_file(path)?)
    } else {
        Ok(ReclaimConfig::default())
    }
}

fn show_config(config_path: &Path) -> anyhow::Result<()> {
    let config = if config_path.exists() {
        ReclaimConfig::from_file(config_path)?
    } else {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
        ReclaimConfig::default()
    };

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, config_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = ReclaimConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(config_path: &Path, key: &str) -> anyhow::Result<()> {
    let mut json = serde_json::to_value(load_or_default(config_path)?)?;
    let value = lookup(&mut json, key)?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(config_path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    // Bare words are taken as strings: `set ocr.languages kor`
    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    let mut json = serde_json::to_value(load_or_default(config_path)?)?;
    *lookup(&mut json, key)? = parsed_value.clone();

    // Round-trip through the typed config so a mistyped value is rejected.
    let config: ReclaimConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

/// Walk a dotted key such as `ocr.timeout_secs`. Only existing keys resolve.
fn lookup<'a>(json: &'a mut serde_json::Value, key: &str) -> anyhow::Result<&'a mut serde_json::Value> {
    key.split('.').try_fold(json, |current, part| {
        current
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))
    })
}

fn show_path(config_path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'reclaim config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_key() {
        let mut value = serde_json::to_value(ReclaimConfig::default()).unwrap();
        assert_eq!(*lookup(&mut value, "selection.ceiling").unwrap(), json!(100_000));
        assert_eq!(*lookup(&mut value, "ocr.languages").unwrap(), json!("kor+eng"));
    }

    #[test]
    fn test_lookup_unknown_key() {
        let mut value = serde_json::to_value(ReclaimConfig::default()).unwrap();
        assert!(lookup(&mut value, "selection.budget").is_err());
        assert!(lookup(&mut value, "selection.ceiling.value").is_err());
    }

    #[test]
    fn test_set_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        set_config(&path, "selection.ceiling", "50000").unwrap();
        set_config(&path, "ocr.languages", "kor").unwrap();

        let config = ReclaimConfig::from_file(&path).unwrap();
        assert_eq!(config.selection.ceiling, 50_000);
        assert_eq!(config.ocr.languages, "kor");
    }

    #[test]
    fn test_set_rejects_mistyped_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(set_config(&path, "selection.ceiling", "lots").is_err());
        assert!(!path.exists());
    }
}
