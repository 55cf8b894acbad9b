//! Subcommands.

pub mod config;
pub mod extract;
pub mod run;
pub mod select;

use std::path::{Path, PathBuf};

use reclaim_core::models::config::ReclaimConfig;

/// Per-user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reclaim")
        .join("config.json")
}

/// Configuration file in effect: `--config` if given, else the per-user file.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the explicit config file, the per-user file if present, or defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<ReclaimConfig> {
    match explicit {
        Some(path) => Ok(ReclaimConfig::from_file(Path::new(path))?),
        None => {
            let path = default_config_path();
            if path.exists() {
                Ok(ReclaimConfig::from_file(&path)?)
            } else {
                Ok(ReclaimConfig::default())
            }
        }
    }
}
