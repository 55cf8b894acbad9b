//! Error types for the reclaim-core library.

use std::fmt;

use thiserror::Error;

/// Main error type for the reclaim library.
#[derive(Error, Debug)]
pub enum ReclaimError {
    /// Text acquisition error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Amount validation error. Fatal for the whole run.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to text acquisition for a single document.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR command could not be started.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The OCR command exited unsuccessfully.
    #[error("OCR command exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// No attempt finished within the configured timeout.
    #[error("OCR timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Recognition produced no text.
    #[error("no text recognized")]
    EmptyText,

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// I/O error while preparing the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single record whose amount fell outside the plausible range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountViolation {
    /// Original filename of the receipt.
    pub source_id: String,
    /// Amount after coercion (0 when nothing numeric was extracted).
    pub amount: u64,
}

impl fmt::Display for AmountViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (extracted amount: {})", self.source_id, self.amount)
    }
}

/// Errors raised by the amount validator.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// One or more amounts fell outside `[min, max]`.
    #[error("{} receipt(s) with amounts outside [{min}, {max}]: {}", .violations.len(), list(.violations))]
    AmountsOutOfRange {
        min: u64,
        max: u64,
        violations: Vec<AmountViolation>,
    },

    /// The configured bounds are unusable.
    #[error("invalid amount bounds: min {min} > max {max}")]
    InvalidBounds { min: u64, max: u64 },
}

fn list(violations: &[AmountViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for the reclaim library.
pub type Result<T> = std::result::Result<T, ReclaimError>;
