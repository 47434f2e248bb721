//! The extracted invoice record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::{ExtractionStatus, Reason, StatusClassifier};

/// Sentinel vendor name used when no vendor could be identified.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// One extracted record per input document. Fields are in ledger column
/// order. Created once by the extractor and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Source document filename (external identifier).
    pub filename: String,

    /// Invoice date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Vendor name; never empty, falls back to [`UNKNOWN_VENDOR`].
    pub vendor: String,

    /// Invoice number as printed on the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Net amount (before VAT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<Decimal>,

    /// VAT rate in percent.
    pub vat_rate: u8,

    /// VAT amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<Decimal>,

    /// Gross amount (after VAT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross: Option<Decimal>,

    /// Expense category; assigned downstream, empty at extraction time.
    #[serde(default)]
    pub category: String,

    /// Confidence classification.
    pub status: ExtractionStatus,

    /// Ordered reasons explaining the classification.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Reason>,
}

impl InvoiceRecord {
    /// Record for a document whose processing failed outright.
    pub fn from_failure(
        filename: impl Into<String>,
        detail: impl Into<String>,
        vat_rate: u8,
    ) -> Self {
        let mut classifier = StatusClassifier::new();
        classifier.push(Reason::ExtractionFailed {
            detail: detail.into(),
        });
        let (status, notes) = classifier.finish();

        Self {
            filename: filename.into(),
            date: None,
            vendor: UNKNOWN_VENDOR.to_string(),
            invoice_number: None,
            net: None,
            vat_rate,
            vat_amount: None,
            gross: None,
            category: String::new(),
            status,
            notes,
        }
    }

    /// Date rendered in canonical `DD.MM.YYYY` form.
    pub fn date_text(&self) -> Option<String> {
        self.date.map(|d| d.format("%d.%m.%Y").to_string())
    }

    /// Notes rendered for display, semicolon-joined.
    pub fn notes_text(&self) -> String {
        self.notes
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
