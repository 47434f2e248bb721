//! Extraction status classification.
//!
//! Every check that degrades confidence in an extracted record pushes a
//! [`Reason`] into the [`StatusClassifier`]. Each reason carries the severity
//! tier it triggers; the classifier only ever raises the status, so the final
//! tier is the highest one reached while the checks ran.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Confidence classification for one extracted record.
///
/// Ordering is severity: `Ok < Uncertain < ManualReviewNeeded`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionStatus {
    /// All fields extracted without deficiencies.
    #[default]
    Ok,
    /// At least one field is missing or suspect.
    Uncertain,
    /// The record is unusable without a human looking at the document.
    ManualReviewNeeded,
}

impl ExtractionStatus {
    /// Raise the status to `other` if it is more severe. Never lowers.
    pub fn raise(&mut self, other: ExtractionStatus) {
        if other > *self {
            *self = other;
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Ok => "OK",
            ExtractionStatus::Uncertain => "UNCERTAIN",
            ExtractionStatus::ManualReviewNeeded => "MANUAL_REVIEW_NEEDED",
        }
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured note explaining why confidence was degraded.
///
/// Rendered to display text only at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Reason {
    /// The source document yielded no text at all.
    NoTextExtracted,
    /// No line qualified as the vendor name.
    VendorUnclear,
    /// No labelled invoice number matched.
    InvoiceNumberNotFound,
    /// No date candidate parsed.
    DateNotFound,
    /// The VAT rate was not found in the text and the default was applied.
    VatRateAssumed { rate: u8 },
    /// Only one amount candidate existed; net and VAT were computed from it.
    SingleAmountOnly,
    /// net + vat_amount did not reproduce gross within tolerance.
    AmountValidationFailed,
    /// Reconciliation left net, VAT or gross unassigned.
    MissingAmountData,
    /// An unrecoverable failure occurred while processing the document.
    ExtractionFailed { detail: String },
}

impl Reason {
    /// The severity tier this reason triggers.
    ///
    /// `VatRateAssumed` is note-only: it documents the fallback without
    /// degrading confidence.
    pub fn severity(&self) -> ExtractionStatus {
        match self {
            Reason::VatRateAssumed { .. } => ExtractionStatus::Ok,
            Reason::VendorUnclear
            | Reason::InvoiceNumberNotFound
            | Reason::DateNotFound
            | Reason::SingleAmountOnly
            | Reason::AmountValidationFailed => ExtractionStatus::Uncertain,
            Reason::NoTextExtracted
            | Reason::MissingAmountData
            | Reason::ExtractionFailed { .. } => ExtractionStatus::ManualReviewNeeded,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::NoTextExtracted => f.write_str("No text extracted"),
            Reason::VendorUnclear => f.write_str("Vendor name unclear"),
            Reason::InvoiceNumberNotFound => f.write_str("Invoice number not found"),
            Reason::DateNotFound => f.write_str("Date not found"),
            Reason::VatRateAssumed { rate } => write!(f, "VAT rate assumed {}%", rate),
            Reason::SingleAmountOnly => f.write_str("Only one amount found, calculated net/VAT"),
            Reason::AmountValidationFailed => f.write_str("Amount validation failed"),
            Reason::MissingAmountData => f.write_str("Missing amount data"),
            Reason::ExtractionFailed { detail } => write!(f, "Extraction error: {}", detail),
        }
    }
}

/// Accumulates reasons and the resulting status for one document.
#[derive(Debug, Default)]
pub struct StatusClassifier {
    status: ExtractionStatus,
    notes: Vec<Reason>,
}

impl StatusClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reason, raising the status to the reason's severity.
    pub fn push(&mut self, reason: Reason) {
        self.status.raise(reason.severity());
        self.notes.push(reason);
    }

    pub fn status(&self) -> ExtractionStatus {
        self.status
    }

    /// Consume the classifier, yielding final status and the ordered notes.
    pub fn finish(self) -> (ExtractionStatus, Vec<Reason>) {
        (self.status, self.notes)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(ExtractionStatus::Ok < ExtractionStatus::Uncertain);
        assert!(ExtractionStatus::Uncertain < ExtractionStatus::ManualReviewNeeded);
    }

    #[test]
    fn test_raise_is_monotonic() {
        let mut status = ExtractionStatus::ManualReviewNeeded;
        status.raise(ExtractionStatus::Uncertain);
        assert_eq!(status, ExtractionStatus::ManualReviewNeeded);

        status = ExtractionStatus::Ok;
        status.raise(ExtractionStatus::Uncertain);
        assert_eq!(status, ExtractionStatus::Uncertain);
    }

    #[test]
    fn test_classifier_keeps_highest_status() {
        let mut classifier = StatusClassifier::new();
        classifier.push(Reason::MissingAmountData);
        classifier.push(Reason::DateNotFound);

        let (status, notes) = classifier.finish();
        assert_eq!(status, ExtractionStatus::ManualReviewNeeded);
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_assumed_vat_rate_does_not_degrade() {
        let mut classifier = StatusClassifier::new();
        classifier.push(Reason::VatRateAssumed { rate: 19 });
        assert_eq!(classifier.status(), ExtractionStatus::Ok);
    }

    #[test]
    fn test_reason_rendering() {
        assert_eq!(
            Reason::VatRateAssumed { rate: 19 }.to_string(),
            "VAT rate assumed 19%"
        );
        assert_eq!(Reason::MissingAmountData.to_string(), "Missing amount data");
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ExtractionStatus::ManualReviewNeeded).unwrap();
        assert_eq!(json, "\"MANUAL_REVIEW_NEEDED\"");
    }
}
