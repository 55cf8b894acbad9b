//! End-to-end receipt processing.
//!
//! Extraction runs per document and never aborts the batch. Validation,
//! numbering and selection run once over the whole batch in [`finalize`].

use std::path::{Path, PathBuf};

use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{OcrError, ReclaimError, Result};
use crate::ledger::{AmountValidator, Ledger};
use crate::models::config::ReclaimConfig;
use crate::models::receipt::ExtractedReceipt;
use crate::ocr::{acquire_text, AcquirePolicy, TextSource};
use crate::receipt::{ExtractionResult, ReceiptParser};
use crate::selection::{SelectionResult, SubsetSelector};

/// A document whose text could not be acquired. It is left out of the ledger.
#[derive(Debug)]
pub struct AcquisitionFailure {
    pub source_id: String,
    pub error: OcrError,
}

/// Outcome of one extraction batch, in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub extracted: Vec<ExtractionResult>,
    pub failures: Vec<AcquisitionFailure>,
}

impl BatchOutcome {
    /// Extracted receipts, ready for [`finalize`].
    pub fn receipts(&self) -> Vec<ExtractedReceipt> {
        self.extracted.iter().map(|r| r.receipt.clone()).collect()
    }

    fn push(&mut self, outcome: std::result::Result<ExtractionResult, AcquisitionFailure>) {
        match outcome {
            Ok(result) => self.extracted.push(result),
            Err(failure) => self.failures.push(failure),
        }
    }
}

/// Final ledger with the selection applied.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub ledger: Ledger,
    pub selection: SelectionResult,
}

impl RunReport {
    /// Sequence numbers left out of the submission.
    pub fn excluded_ids(&self) -> Vec<u32> {
        self.selection.excluded(self.ledger.ids()).into_iter().collect()
    }
}

/// Source identifier for a document: its file name.
pub fn source_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Text acquisition plus field extraction over a set of images.
pub struct ReceiptPipeline<S, P> {
    source: S,
    parser: P,
    policy: AcquirePolicy,
    jobs: usize,
}

impl<S: TextSource, P: ReceiptParser> ReceiptPipeline<S, P> {
    pub fn new(source: S, parser: P) -> Self {
        Self {
            source,
            parser,
            policy: AcquirePolicy::default(),
            jobs: 1,
        }
    }

    /// Set the per-document timeout and retry policy.
    pub fn with_policy(mut self, policy: AcquirePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set how many documents are recognized at once.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Acquire and parse one document.
    pub async fn extract_one(&self, path: &Path) -> std::result::Result<ExtractionResult, AcquisitionFailure> {
        let source_id = source_id(path);

        match acquire_text(&self.source, path, self.policy).await {
            Ok(text) => Ok(self.parser.parse(&source_id, &text)),
            Err(error) => {
                warn!(source_id = %source_id, error = %error, "skipping document, text acquisition failed");
                Err(AcquisitionFailure { source_id, error })
            }
        }
    }

    /// Per-document outcomes in input order, at most `jobs` in flight.
    pub fn extract_stream<'a>(
        &'a self,
        paths: &'a [PathBuf],
    ) -> impl Stream<Item = std::result::Result<ExtractionResult, AcquisitionFailure>> + 'a {
        stream::iter(paths)
            .map(move |path| self.extract_one(path))
            .buffered(self.jobs)
    }

    /// Extract every document. Failures are collected, never propagated.
    pub async fn extract_batch(&self, paths: &[PathBuf]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let mut results = std::pin::pin!(self.extract_stream(paths));

        while let Some(result) = results.next().await {
            outcome.push(result);
        }

        info!(
            extracted = outcome.extracted.len(),
            failed = outcome.failures.len(),
            "extraction batch finished"
        );
        outcome
    }
}

#[cfg(feature = "native")]
impl ReceiptPipeline<crate::ocr::TesseractEngine, crate::receipt::HeuristicReceiptParser> {
    /// Tesseract-backed pipeline configured from `config.ocr`.
    pub fn from_config(config: &ReclaimConfig) -> Self {
        Self::new(
            crate::ocr::TesseractEngine::from_config(&config.ocr),
            crate::receipt::HeuristicReceiptParser::new(),
        )
        .with_policy(AcquirePolicy::from(&config.ocr))
        .with_jobs(config.ocr.jobs)
    }
}

/// Validate the whole batch, number it and pick the submission.
///
/// Any amount outside the configured range fails the run before selection.
pub fn finalize(extracted: Vec<ExtractedReceipt>, config: &ReclaimConfig) -> Result<RunReport> {
    if config.selection.ceiling == 0 {
        return Err(ReclaimError::Config("selection.ceiling must be positive".into()));
    }
    let validator = AmountValidator::from_config(&config.validation)?;
    let records = validator.validate(extracted)?;

    let mut ledger = Ledger::build(records);
    let selection = SubsetSelector::new(config.selection.ceiling).select(&ledger.selection_items());
    ledger.apply_selection(&selection);

    info!(
        receipts = ledger.len(),
        included = selection.included.len(),
        total = selection.total,
        ceiling = config.selection.ceiling,
        "selection applied"
    );

    Ok(RunReport { ledger, selection })
}
