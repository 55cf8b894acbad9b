//! Core library for receipt OCR processing.
//!
//! This crate provides:
//! - Text acquisition through an external OCR command, with timeout and retry
//! - Vendor classification and date, time and amount extraction for Korean
//!   card slips and coffee-chain receipts
//! - Whole-batch amount validation and chronological ledger numbering
//! - Budget-capped receipt selection (0/1 subset-sum)
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the caller.

pub mod error;
pub mod ledger;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod receipt;
pub mod selection;

pub use error::{OcrError, ReclaimError, Result, ValidationError};
pub use ledger::{AmountValidator, Ledger, LedgerEntry, ReportRow};
pub use models::config::ReclaimConfig;
pub use models::receipt::{ExtractedReceipt, ReceiptDate, ReceiptRecord, VendorCategory};
pub use ocr::{acquire_text, AcquirePolicy, TextSource};
#[cfg(feature = "native")]
pub use ocr::{ImagePreprocessor, TesseractEngine};
pub use pipeline::{finalize, AcquisitionFailure, BatchOutcome, ReceiptPipeline, RunReport};
pub use receipt::{ExtractionResult, HeuristicReceiptParser, ReceiptParser};
pub use selection::{SelectionItem, SelectionResult, SubsetSelector};
