//! Invoice number extraction.

use regex::Regex;

use super::patterns::alternation;
use super::{FieldExtractor, FieldMatch};

/// Invoice number extractor.
///
/// Matches a case-insensitive label from the configured vocabulary followed
/// by a contiguous run of letters, digits, hyphens and slashes.
pub struct InvoiceNumberExtractor {
    pattern: Regex,
}

impl InvoiceNumberExtractor {
    pub fn new(labels: &[String]) -> Self {
        let pattern = format!(r"(?i)(?:{})[\s:]*([A-Z0-9\-/]+)", alternation(labels));
        Self {
            pattern: Regex::new(&pattern).expect("label vocabulary is escaped"),
        }
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = FieldMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .map(|caps| {
                let m = caps.get(1).unwrap();
                let value = m.as_str().trim().to_string();
                FieldMatch::new(value, m.as_str(), (m.start(), m.end()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::config::ExtractionConfig;

    fn extractor() -> InvoiceNumberExtractor {
        InvoiceNumberExtractor::new(&ExtractionConfig::default().invoice_number_labels)
    }

    #[test]
    fn test_labelled_number() {
        let result = extractor().extract("Rechnungsnummer: RE-2024/0815").unwrap();
        assert_eq!(result.value, "RE-2024/0815");
    }

    #[test]
    fn test_label_is_case_insensitive() {
        let result = extractor().extract("RECHNUNG NR. 4711").unwrap();
        assert_eq!(result.value, "4711");
    }

    #[test]
    fn test_specific_label_wins_over_prefix() {
        // "Rechnung" must not shadow "Rechnungsnummer" and capture its tail
        let result = extractor().extract("Rechnungsnummer 2024-001").unwrap();
        assert_eq!(result.value, "2024-001");
    }

    #[test]
    fn test_no_label_no_match() {
        assert!(extractor().extract("Lieferschein 12345").is_none());
    }
}
