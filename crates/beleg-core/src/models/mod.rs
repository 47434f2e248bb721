//! Data models for invoice records, status classification and configuration.

pub mod config;
pub mod record;
pub mod status;

pub use config::{BelegConfig, ExtractionConfig, FolderConfig, PdfConfig};
pub use record::{InvoiceRecord, UNKNOWN_VENDOR};
pub use status::{ExtractionStatus, Reason, StatusClassifier};
