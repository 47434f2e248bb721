//! Invoice field extraction and record assembly.

mod reconcile;
pub mod rules;

pub use reconcile::{candidate_amounts, reconcile_amounts, AmountBreakdown};

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::record::{InvoiceRecord, UNKNOWN_VENDOR};
use crate::models::status::{Reason, StatusClassifier};

use rules::{
    normalize_german_date, AmountExtractor, DateExtractor, FieldExtractor,
    InvoiceNumberExtractor, VatRateExtractor, VendorIdentifier,
};

/// Absolute tolerance for the net + VAT = gross recheck.
const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Assembles one [`InvoiceRecord`] per document text.
///
/// Compiles the vocabulary-driven matchers once; extraction itself is pure,
/// total over any input text, and never raises past its boundary.
pub struct Extractor {
    amounts: AmountExtractor,
    dates: DateExtractor,
    invoice_number: InvoiceNumberExtractor,
    vat_rate: VatRateExtractor,
    vendor: VendorIdentifier,
    default_vat_rate: u8,
    net_tolerance_percent: u8,
}

impl Extractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            amounts: AmountExtractor::new(),
            dates: DateExtractor::new(),
            invoice_number: InvoiceNumberExtractor::new(&config.invoice_number_labels),
            vat_rate: VatRateExtractor::new(&config.vat_keywords),
            vendor: VendorIdentifier::new(&config.company_suffixes, &config.vendor_prefixes),
            default_vat_rate: config.default_vat_rate,
            net_tolerance_percent: config.net_tolerance_percent,
        }
    }

    /// Extract a record from the document text.
    pub fn extract(&self, filename: &str, text: &str) -> InvoiceRecord {
        let mut classifier = StatusClassifier::new();

        if text.trim().is_empty() {
            classifier.push(Reason::NoTextExtracted);
            let (status, notes) = classifier.finish();
            return InvoiceRecord {
                filename: filename.to_string(),
                date: None,
                vendor: UNKNOWN_VENDOR.to_string(),
                invoice_number: None,
                net: None,
                vat_rate: self.default_vat_rate,
                vat_amount: None,
                gross: None,
                category: String::new(),
                status,
                notes,
            };
        }

        debug!(filename, chars = text.len(), "extracting record");

        let vendor = match self.vendor.identify(text) {
            Some(vendor) => vendor,
            None => {
                classifier.push(Reason::VendorUnclear);
                UNKNOWN_VENDOR.to_string()
            }
        };

        let invoice_number = match self.invoice_number.extract(text) {
            Some(m) => Some(m.value),
            None => {
                classifier.push(Reason::InvoiceNumberNotFound);
                None
            }
        };

        // First candidate in document order that is an actual calendar date;
        // unparsable candidates are skipped without comment.
        let date = self
            .dates
            .extract_all(text)
            .into_iter()
            .find_map(|m| normalize_german_date(&m.value));
        if date.is_none() {
            classifier.push(Reason::DateNotFound);
        }

        let vat_rate = match self.vat_rate.extract(text) {
            Some(m) => m.value,
            None => {
                classifier.push(Reason::VatRateAssumed {
                    rate: self.default_vat_rate,
                });
                self.default_vat_rate
            }
        };

        let candidates = candidate_amounts(&self.amounts.extract_all(text));
        let amounts = reconcile_amounts(&candidates, vat_rate, self.net_tolerance_percent);
        if amounts.single_candidate {
            classifier.push(Reason::SingleAmountOnly);
        }

        match (amounts.net, amounts.vat_amount, amounts.gross) {
            (Some(net), Some(vat_amount), Some(gross)) => {
                if ((net + vat_amount) - gross).abs() > AMOUNT_TOLERANCE {
                    classifier.push(Reason::AmountValidationFailed);
                }
            }
            _ => classifier.push(Reason::MissingAmountData),
        }

        let (status, notes) = classifier.finish();
        info!(filename, status = %status, "record assembled");

        InvoiceRecord {
            filename: filename.to_string(),
            date,
            vendor,
            invoice_number,
            net: amounts.net,
            vat_rate,
            vat_amount: amounts.vat_amount,
            gross: amounts.gross,
            category: String::new(),
            status,
            notes,
        }
    }

    /// Record for a document whose processing failed with an unrecoverable
    /// error. The batch continues; only this record is marked.
    pub fn failure_record(&self, filename: &str, detail: impl Into<String>) -> InvoiceRecord {
        InvoiceRecord::from_failure(filename, detail, self.default_vat_rate)
    }
}
