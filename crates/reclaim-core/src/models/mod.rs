//! Data models shared across the pipeline.

pub mod config;
pub mod receipt;

pub use config::ReclaimConfig;
pub use receipt::{ExtractedReceipt, ReceiptDate, ReceiptRecord, VendorCategory, NOT_FOUND};
