//! The xlsx ledger of extracted invoice records.
//!
//! rust_xlsxwriter only creates new workbooks, so appending re-reads the
//! existing rows with calamine and rewrites the whole file. Severity
//! highlighting of pre-existing rows is re-derived from their status column.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, DataValidation, Format, Workbook};
use tracing::debug;

use beleg_core::{ExtractionStatus, InvoiceRecord};

/// Ledger column headers, in schema order.
pub const HEADERS: [&str; 11] = [
    "Filename",
    "Date",
    "Vendor",
    "Invoice_Number",
    "Net",
    "VAT_Rate",
    "VAT_Amount",
    "Gross",
    "Category",
    "Extraction_Status",
    "Notes",
];

/// Column indices used by the report and the formats below.
pub const COL_DATE: usize = 1;
pub const COL_VENDOR: usize = 2;
pub const COL_GROSS: usize = 7;
pub const COL_CATEGORY: usize = 8;
pub const COL_STATUS: usize = 9;

const SHEET_NAME: &str = "Invoices";
const COLUMN_WIDTHS: [f64; 11] = [
    30.0, 12.0, 25.0, 15.0, 12.0, 10.0, 12.0, 12.0, 15.0, 18.0, 40.0,
];
/// Currency-formatted columns: Net, VAT_Amount, Gross.
const CURRENCY_COLUMNS: [usize; 3] = [4, 6, 7];
/// Rows covered by the category dropdown.
const CATEGORY_ROWS: u32 = 999;

/// A materialized ledger cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

/// One materialized ledger row.
#[derive(Debug, Clone)]
pub struct LedgerRow(pub Vec<Cell>);

impl LedgerRow {
    pub fn text(&self, col: usize) -> Option<&str> {
        match self.0.get(col) {
            Some(Cell::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, col: usize) -> Option<f64> {
        match self.0.get(col) {
            Some(Cell::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

/// The persistence collaborator: one workbook, one "Invoices" sheet.
pub struct Ledger {
    path: PathBuf,
    categories: Vec<String>,
}

impl Ledger {
    pub fn new(path: PathBuf, categories: Vec<String>) -> Self {
        Self { path, categories }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create an empty ledger (header only) if none exists yet.
    pub fn ensure_exists(&self) -> anyhow::Result<()> {
        if !self.exists() {
            self.write_all(&[])?;
            debug!("created ledger at {}", self.path.display());
        }
        Ok(())
    }

    /// All data rows currently in the ledger; empty if the file is missing.
    pub fn rows(&self) -> anyhow::Result<Vec<LedgerRow>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .with_context(|| format!("opening ledger {}", self.path.display()))?;
        let range = workbook
            .worksheet_range(SHEET_NAME)
            .with_context(|| format!("ledger has no '{}' sheet", SHEET_NAME))?;

        let mut rows = Vec::new();
        for row in range.rows().skip(1) {
            // Rows without a filename are padding
            if !matches!(row.first(), Some(Data::String(s)) if !s.is_empty()) {
                continue;
            }

            let cells = row
                .iter()
                .map(|data| match data {
                    Data::Empty => Cell::Empty,
                    Data::String(s) => Cell::Text(s.clone()),
                    Data::Float(f) => Cell::Number(*f),
                    Data::Int(i) => Cell::Number(*i as f64),
                    other => Cell::Text(other.to_string()),
                })
                .collect();
            rows.push(LedgerRow(cells));
        }

        Ok(rows)
    }

    /// The set of filenames already recorded.
    pub fn existing_filenames(&self) -> anyhow::Result<HashSet<String>> {
        Ok(self
            .rows()?
            .iter()
            .filter_map(|row| row.text(0).map(str::to_string))
            .collect())
    }

    /// Append one record, preserving all existing rows.
    pub fn append(&self, record: &InvoiceRecord) -> anyhow::Result<()> {
        let mut rows = self.rows()?;
        rows.push(record_row(record));
        self.write_all(&rows)
    }

    fn write_all(&self, rows: &[LedgerRow]) -> anyhow::Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let bold = Format::new().set_bold();
        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
        }
        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }

        let plain = row_formats(None);
        let uncertain = row_formats(Some(Color::Yellow));
        let review = row_formats(Some(Color::Red));

        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            let formats = match row.text(COL_STATUS) {
                Some(s) if s == ExtractionStatus::Uncertain.as_str() => &uncertain,
                Some(s) if s == ExtractionStatus::ManualReviewNeeded.as_str() => &review,
                _ => &plain,
            };

            for col in 0..HEADERS.len() {
                let format = formats.for_column(col);
                match row.0.get(col).unwrap_or(&Cell::Empty) {
                    Cell::Empty => {
                        // Highlighting covers the whole row, blanks included
                        if formats.highlighted {
                            worksheet.write_blank(r, col as u16, format)?;
                        }
                    }
                    Cell::Text(s) => {
                        worksheet.write_string_with_format(r, col as u16, s, format)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number_with_format(r, col as u16, *n, format)?;
                    }
                }
            }
        }

        if !self.categories.is_empty() {
            let dropdown = DataValidation::new().allow_list_strings(&self.categories)?;
            worksheet.add_data_validation(
                1,
                COL_CATEGORY as u16,
                CATEGORY_ROWS,
                COL_CATEGORY as u16,
                &dropdown,
            )?;
        }

        workbook
            .save(&self.path)
            .with_context(|| format!("saving ledger {}", self.path.display()))?;
        Ok(())
    }
}

struct RowFormats {
    plain: Format,
    currency: Format,
    date: Format,
    highlighted: bool,
}

impl RowFormats {
    fn for_column(&self, col: usize) -> &Format {
        if CURRENCY_COLUMNS.contains(&col) {
            &self.currency
        } else if col == COL_DATE {
            &self.date
        } else {
            &self.plain
        }
    }
}

fn row_formats(fill: Option<Color>) -> RowFormats {
    let base = match fill {
        Some(color) => Format::new().set_background_color(color),
        None => Format::new(),
    };

    RowFormats {
        plain: base.clone(),
        currency: base.clone().set_num_format("#,##0.00 €"),
        date: base.set_num_format("DD.MM.YYYY"),
        highlighted: fill.is_some(),
    }
}

fn record_row(record: &InvoiceRecord) -> LedgerRow {
    let decimal_cell = |value: Option<rust_decimal::Decimal>| {
        value
            .and_then(|d| d.to_f64())
            .map(Cell::Number)
            .unwrap_or(Cell::Empty)
    };
    let text_cell = |value: Option<String>| value.map(Cell::Text).unwrap_or(Cell::Empty);

    LedgerRow(vec![
        Cell::Text(record.filename.clone()),
        text_cell(record.date_text()),
        Cell::Text(record.vendor.clone()),
        text_cell(record.invoice_number.clone()),
        decimal_cell(record.net),
        Cell::Number(f64::from(record.vat_rate)),
        decimal_cell(record.vat_amount),
        decimal_cell(record.gross),
        if record.category.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(record.category.clone())
        },
        Cell::Text(record.status.as_str().to_string()),
        if record.notes.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(record.notes_text())
        },
    ])
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use beleg_core::{ExtractionStatus, Reason};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn sample_record(filename: &str, status: ExtractionStatus) -> InvoiceRecord {
        InvoiceRecord {
            filename: filename.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15),
            vendor: "Musterfirma GmbH".to_string(),
            invoice_number: Some("RE-2024-001".to_string()),
            net: Some(Decimal::from_str("100.00").unwrap()),
            vat_rate: 19,
            vat_amount: Some(Decimal::from_str("19.00").unwrap()),
            gross: Some(Decimal::from_str("119.00").unwrap()),
            category: String::new(),
            status,
            notes: vec![],
        }
    }

    fn test_ledger(dir: &std::path::Path) -> Ledger {
        Ledger::new(
            dir.join("tax_records.xlsx"),
            vec!["Software".to_string(), "Sonstiges".to_string()],
        )
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = test_ledger(dir.path());

        assert!(ledger.rows().unwrap().is_empty());
        assert!(ledger.existing_filenames().unwrap().is_empty());
    }

    #[test]
    fn test_append_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = test_ledger(dir.path());

        ledger
            .append(&sample_record("a.pdf", ExtractionStatus::Ok))
            .unwrap();

        let filenames = ledger.existing_filenames().unwrap();
        assert!(filenames.contains("a.pdf"));

        let rows = ledger.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(COL_VENDOR), Some("Musterfirma GmbH"));
        assert_eq!(rows[0].text(COL_STATUS), Some("OK"));
        assert_eq!(rows[0].number(COL_GROSS), Some(119.0));
    }

    #[test]
    fn test_second_append_preserves_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = test_ledger(dir.path());

        ledger
            .append(&sample_record("a.pdf", ExtractionStatus::Ok))
            .unwrap();
        ledger
            .append(&sample_record("b.pdf", ExtractionStatus::Uncertain))
            .unwrap();

        let rows = ledger.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text(0), Some("a.pdf"));
        assert_eq!(rows[1].text(0), Some("b.pdf"));
        assert_eq!(rows[1].text(COL_STATUS), Some("UNCERTAIN"));
    }

    #[test]
    fn test_notes_are_rendered_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = test_ledger(dir.path());

        let mut record = sample_record("c.pdf", ExtractionStatus::Uncertain);
        record.notes = vec![Reason::DateNotFound, Reason::VatRateAssumed { rate: 19 }];
        ledger.append(&record).unwrap();

        let rows = ledger.rows().unwrap();
        assert_eq!(
            rows[0].text(10),
            Some("Date not found; VAT rate assumed 19%")
        );
    }

    #[test]
    fn test_ensure_exists_creates_header_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = test_ledger(dir.path());

        ledger.ensure_exists().unwrap();

        assert!(ledger.exists());
        assert!(ledger.rows().unwrap().is_empty());
    }
}
