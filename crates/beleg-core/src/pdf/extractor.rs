//! PDF text extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use super::Result;
use crate::error::PdfError;

/// Extracts the text an invoice was printed with.
///
/// Loads the document with lopdf (handling empty-password encryption) and
/// runs pdf-extract over the leading pages. Extraction yielding no text is
/// not an error; the caller classifies empty text.
pub struct PdfExtractor {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Open a PDF file.
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| PdfError::Parse(e.to_string()))?;
        Self::load(&data)
    }

    /// Load a PDF from bytes.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("loaded PDF with {} pages", doc.get_pages().len());
        Ok(Self {
            document: doc,
            raw_data,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Concatenated plain text of the first `max_pages` pages.
    pub fn extract_text(&self, max_pages: usize) -> Result<String> {
        let page_count = self.page_count() as usize;

        if page_count <= max_pages {
            return pdf_extract::extract_text_from_mem(&self.raw_data)
                .map_err(|e| PdfError::TextExtraction(e.to_string()));
        }

        // Truncate a copy so pdf-extract only sees the leading pages.
        let mut truncated = self.document.clone();
        let beyond: Vec<u32> = (max_pages as u32 + 1..=page_count as u32).collect();
        truncated.delete_pages(&beyond);

        let mut data = Vec::new();
        if truncated.save_to(&mut data).is_ok() {
            match pdf_extract::extract_text_from_mem(&data) {
                Ok(text) => return Ok(text),
                Err(e) => warn!("pdf-extract failed on truncated document: {}", e),
            }
        }

        // lopdf's own text extraction as fallback
        let pages: Vec<u32> = (1..=max_pages as u32).collect();
        self.document
            .extract_text(&pages)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rejects_non_pdf_data() {
        assert!(matches!(
            PdfExtractor::load(b"not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_load_rejects_empty_data() {
        assert!(PdfExtractor::load(&[]).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        assert!(PdfExtractor::open(Path::new("does/not/exist.pdf")).is_err());
    }
}
