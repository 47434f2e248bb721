//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the beleg pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BelegConfig {
    /// Working folder layout.
    pub folders: FolderConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Folder layout around the tool's working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Folder scanned for unprocessed invoices.
    pub inbox: PathBuf,

    /// Root of the vendor-bucketed archive.
    pub archive: PathBuf,

    /// Path of the xlsx ledger.
    pub ledger: PathBuf,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            inbox: PathBuf::from("new"),
            archive: PathBuf::from("archive"),
            ledger: PathBuf::from("tax_records.xlsx"),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Number of leading pages whose text is extracted.
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { max_pages: 3 }
    }
}

/// Invoice extraction configuration.
///
/// The vocabularies drive the label-based matchers; they are compiled into
/// regexes once per [`crate::Extractor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Labels preceding the invoice number.
    pub invoice_number_labels: Vec<String>,

    /// Keywords following the VAT rate.
    pub vat_keywords: Vec<String>,

    /// Legal-form tokens identifying a company line.
    pub company_suffixes: Vec<String>,

    /// Prefix labels stripped from a vendor line.
    pub vendor_prefixes: Vec<String>,

    /// Expense categories offered by the ledger's category dropdown.
    pub expense_categories: Vec<String>,

    /// VAT rate in percent applied when none is found in the text.
    pub default_vat_rate: u8,

    /// Tolerance, in percent of the expected net, for matching a candidate
    /// amount as the net amount.
    pub net_tolerance_percent: u8,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            invoice_number_labels: vec![
                "Rechnungsnummer".to_string(),
                "Rechnungs-Nr.".to_string(),
                "Rechnungs-Nr".to_string(),
                "Rechnung Nr.".to_string(),
                "Rechnung".to_string(),
                "Invoice".to_string(),
            ],
            vat_keywords: vec![
                "Mehrwertsteuer".to_string(),
                "Umsatzsteuer".to_string(),
                "MwSt".to_string(),
                "USt".to_string(),
            ],
            company_suffixes: vec![
                "GmbH".to_string(),
                "AG".to_string(),
                "UG".to_string(),
                "KG".to_string(),
                "OHG".to_string(),
                "e.V.".to_string(),
            ],
            vendor_prefixes: vec![
                "Von:".to_string(),
                "From:".to_string(),
                "Lieferant:".to_string(),
                "Aussteller:".to_string(),
            ],
            expense_categories: vec![
                "Büromaterial".to_string(),
                "Software".to_string(),
                "Reisekosten".to_string(),
                "Marketing".to_string(),
                "Telefon/Internet".to_string(),
                "Miete".to_string(),
                "Versicherung".to_string(),
                "Weiterbildung".to_string(),
                "Beratung".to_string(),
                "Sonstiges".to_string(),
            ],
            default_vat_rate: 19,
            net_tolerance_percent: 10,
        }
    }
}

impl BelegConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
