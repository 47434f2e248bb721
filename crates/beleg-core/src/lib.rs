//! Core library for German tax invoice extraction.
//!
//! This crate provides:
//! - PDF text extraction (first pages of a vendor invoice)
//! - German invoice field extraction (vendor, invoice number, dates, amounts, VAT)
//! - Amount reconciliation into net / VAT / gross
//! - Confidence classification per extracted record

pub mod archive;
pub mod error;
pub mod extract;
pub mod models;
pub mod pdf;

pub use archive::vendor_key;
pub use error::{BelegError, PdfError, Result};
pub use extract::Extractor;
pub use models::config::{BelegConfig, ExtractionConfig, FolderConfig, PdfConfig};
pub use models::record::{InvoiceRecord, UNKNOWN_VENDOR};
pub use models::status::{ExtractionStatus, Reason, StatusClassifier};
pub use pdf::PdfExtractor;
