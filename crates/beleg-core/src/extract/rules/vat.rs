//! VAT rate extraction.

use regex::Regex;

use super::patterns::alternation;
use super::{FieldExtractor, FieldMatch};

/// VAT rate extractor.
///
/// Matches a 1-2 digit percentage immediately adjacent to one of the
/// configured VAT keywords, e.g. "19% MwSt" or "7 % Umsatzsteuer".
pub struct VatRateExtractor {
    pattern: Regex,
}

impl VatRateExtractor {
    pub fn new(keywords: &[String]) -> Self {
        let pattern = format!(r"(?i)(\d{{1,2}})[%\s]*(?:{})", alternation(keywords));
        Self {
            pattern: Regex::new(&pattern).expect("keyword vocabulary is escaped"),
        }
    }
}

impl FieldExtractor for VatRateExtractor {
    type Output = FieldMatch<u8>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1).unwrap();
                m.as_str()
                    .parse::<u8>()
                    .ok()
                    .map(|rate| FieldMatch::new(rate, m.as_str(), (m.start(), m.end())))
            })
            .collect()
    }
}
