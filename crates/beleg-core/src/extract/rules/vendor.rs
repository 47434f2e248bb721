//! Vendor identification.

use regex::Regex;

use super::patterns::{alternation, word_alternation};
use super::{FieldExtractor, FieldMatch};

/// Lines considered when looking for a company-suffix line.
const SUFFIX_SCAN_LINES: usize = 15;

/// Lines considered by the capitalized-words fallback.
const FALLBACK_SCAN_LINES: usize = 5;

/// Company legal-form token matcher (whole word, case-sensitive).
pub struct CompanySuffixExtractor {
    pattern: Regex,
}

impl CompanySuffixExtractor {
    pub fn new(suffixes: &[String]) -> Self {
        let pattern = format!("(?:{})", word_alternation(suffixes));
        Self {
            pattern: Regex::new(&pattern).expect("suffix vocabulary is escaped"),
        }
    }
}

impl FieldExtractor for CompanySuffixExtractor {
    type Output = FieldMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern
            .find(text)
            .map(|m| FieldMatch::new(m.as_str().to_string(), m.as_str(), (m.start(), m.end())))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .find_iter(text)
            .map(|m| FieldMatch::new(m.as_str().to_string(), m.as_str(), (m.start(), m.end())))
            .collect()
    }
}

/// Heuristic vendor name identification over the top of the document.
pub struct VendorIdentifier {
    suffix: CompanySuffixExtractor,
    prefix: Regex,
}

impl VendorIdentifier {
    pub fn new(suffixes: &[String], prefixes: &[String]) -> Self {
        let prefix = format!(r"(?i)^(?:{})\s*", alternation(prefixes));
        Self {
            suffix: CompanySuffixExtractor::new(suffixes),
            prefix: Regex::new(&prefix).expect("prefix vocabulary is escaped"),
        }
    }

    /// Identify the vendor name, or `None` if no line qualifies.
    ///
    /// First pass: the first of the leading 15 lines carrying a legal-form
    /// token, with any sender-prefix label stripped, if its length lands
    /// strictly between 3 and 100 characters. Fallback: the first of the
    /// leading 5 lines between 5 and 80 characters with at least two
    /// capitalized words.
    pub fn identify(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().take(SUFFIX_SCAN_LINES).collect();

        for line in &lines {
            if self.suffix.extract(line).is_none() {
                continue;
            }

            let line = line.trim();
            let cleaned = self.prefix.replace(line, "");
            let len = cleaned.chars().count();
            if len > 3 && len < 100 {
                return Some(cleaned.into_owned());
            }
        }

        for line in lines.iter().take(FALLBACK_SCAN_LINES) {
            let line = line.trim();
            let len = line.chars().count();
            if !(5 < len && len < 80) {
                continue;
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            let capitalized = words
                .iter()
                .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
                .count();
            if words.len() >= 2 && capitalized >= 2 {
                return Some(line.to_string());
            }
        }

        None
    }
}
