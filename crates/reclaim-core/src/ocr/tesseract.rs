//! Tesseract command-line engine wrapper.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{ImagePreprocessor, TextSource};

/// OCR engine backed by the `tesseract` executable.
pub struct TesseractEngine {
    command: PathBuf,
    languages: String,
    preprocessor: Option<ImagePreprocessor>,
}

impl TesseractEngine {
    /// Create an engine from OCR configuration.
    pub fn from_config(config: &OcrConfig) -> Self {
        let preprocessor = config
            .preprocess
            .then(|| ImagePreprocessor::new().with_contrast(config.contrast));

        Self {
            command: PathBuf::from(&config.command),
            languages: config.languages.clone(),
            preprocessor,
        }
    }

    async fn run(&self, image: &Path) -> Result<String, OcrError> {
        let start = Instant::now();

        let output = Command::new(&self.command)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| OcrError::Spawn {
                command: self.command.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(
            image = %image.display(),
            chars = text.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "OCR complete"
        );
        Ok(text)
    }
}

impl TextSource for TesseractEngine {
    async fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let Some(preprocessor) = &self.preprocessor else {
            return self.run(image).await;
        };

        let prepared = preprocessor.prepare(image).await?;
        debug!(
            image = %image.display(),
            prepared = %prepared.path().display(),
            "running OCR on preprocessed copy"
        );
        // `prepared` is deleted on drop, after the engine has read it.
        self.run(prepared.path()).await
    }
}
