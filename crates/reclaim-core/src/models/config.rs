//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the reclaim pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReclaimConfig {
    /// Budget ceiling for selection.
    pub selection: SelectionConfig,

    /// Plausible amount bounds.
    pub validation: ValidationConfig,

    /// Text acquisition configuration.
    pub ocr: OcrConfig,

    /// Where receipt images are read from.
    pub input: InputConfig,

    /// Where the report is written.
    pub output: OutputConfig,

    /// Log file configuration.
    pub logging: LoggingConfig,
}

/// Subset selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Maximum total reimbursable in one submission.
    pub ceiling: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { ceiling: 100_000 }
    }
}

/// Amount validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Smallest plausible amount (inclusive).
    pub min_amount: u64,

    /// Largest plausible amount (inclusive).
    pub max_amount: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_amount: 1000,
            max_amount: 99_999,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// OCR executable.
    pub command: String,

    /// Language packs passed to the engine.
    pub languages: String,

    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,

    /// Extra attempts after a failed or timed-out one.
    pub max_retries: u32,

    /// Convert to grayscale and boost contrast before recognition.
    pub preprocess: bool,

    /// Contrast adjustment used when preprocessing.
    pub contrast: f32,

    /// Number of documents processed concurrently.
    pub jobs: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            languages: "kor+eng".to_string(),
            timeout_secs: 30,
            max_retries: 1,
            preprocess: false,
            contrast: 30.0,
            jobs: 4,
        }
    }
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Input discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding receipt photos.
    pub image_dir: PathBuf,

    /// Accepted file extensions (lower case, without dot).
    pub extensions: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("receipt_images"),
            extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
        }
    }
}

impl InputConfig {
    /// Whether a file name carries one of the accepted extensions.
    pub fn accepts(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|x| *x == e))
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the report.
    pub output_dir: PathBuf,

    /// Report file name.
    pub summary_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            summary_file: "receipt_summary.csv".to_string(),
        }
    }
}

/// Log file configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for timestamped debug/error logs. Console only when unset.
    pub log_dir: Option<PathBuf>,
}

impl ReclaimConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Full path of the report file.
    pub fn summary_path(&self) -> PathBuf {
        self.output.output_dir.join(&self.output.summary_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults() {
        let config = ReclaimConfig::default();
        assert_eq!(config.selection.ceiling, 100_000);
        assert_eq!(config.validation.min_amount, 1000);
        assert_eq!(config.validation.max_amount, 99_999);
        assert_eq!(config.summary_path(), PathBuf::from("output/receipt_summary.csv"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ReclaimConfig =
            serde_json::from_str(r#"{"selection": {"ceiling": 50000}}"#).unwrap();
        assert_eq!(config.selection.ceiling, 50_000);
        assert_eq!(config.validation.max_amount, 99_999);
        assert_eq!(config.ocr.command, "tesseract");
    }

    #[test]
    fn test_accepts_extension_case_insensitively() {
        let input = InputConfig::default();
        assert!(input.accepts(Path::new("IMG_0001.JPG")));
        assert!(input.accepts(Path::new("scan.png")));
        assert!(!input.accepts(Path::new("notes.txt")));
        assert!(!input.accepts(Path::new("no_extension")));
    }
}
