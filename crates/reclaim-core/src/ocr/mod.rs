//! Text acquisition: the boundary to the external OCR engine.

#[cfg(feature = "native")]
mod preprocessing;
#[cfg(feature = "native")]
mod tesseract;

#[cfg(feature = "native")]
pub use preprocessing::ImagePreprocessor;
#[cfg(feature = "native")]
pub use tesseract::TesseractEngine;

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Source of recognized text for a receipt image.
pub trait TextSource {
    /// Recognize the text in one image.
    ///
    /// Returns the raw multi-line text; empty output is allowed here and is
    /// rejected by [`acquire_text`].
    fn recognize(&self, image: &Path) -> impl Future<Output = Result<String, OcrError>>;
}

/// Timeout and retry policy for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquirePolicy {
    /// Limit for each attempt.
    pub timeout: Duration,
    /// Extra attempts after a failed or timed-out one.
    pub max_retries: u32,
}

impl Default for AcquirePolicy {
    fn default() -> Self {
        Self::from(&OcrConfig::default())
    }
}

impl From<&OcrConfig> for AcquirePolicy {
    fn from(config: &OcrConfig) -> Self {
        Self {
            timeout: config.timeout(),
            max_retries: config.max_retries,
        }
    }
}

/// Recognize one image under `policy`.
///
/// Failures and timeouts are retried up to `max_retries` times. Empty text is
/// returned as [`OcrError::EmptyText`] right away; the engine is deterministic
/// so asking again would not help.
pub async fn acquire_text<S: TextSource>(
    source: &S,
    image: &Path,
    policy: AcquirePolicy,
) -> Result<String, OcrError> {
    let attempts = policy.max_retries + 1;
    let mut attempt = 1;

    loop {
        let error = match tokio::time::timeout(policy.timeout, source.recognize(image)).await {
            Ok(Ok(text)) if text.trim().is_empty() => return Err(OcrError::EmptyText),
            Ok(Ok(text)) => {
                debug!(image = %image.display(), attempt, "text recognized");
                return Ok(text);
            }
            Ok(Err(e)) => e,
            Err(_) => OcrError::Timeout(policy.timeout),
        };

        if attempt >= attempts {
            return Err(error);
        }
        warn!(
            image = %image.display(),
            attempt,
            attempts,
            error = %error,
            "OCR attempt failed, retrying"
        );
        attempt += 1;
    }
}
