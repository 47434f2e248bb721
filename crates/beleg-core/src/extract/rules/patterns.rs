//! Regex patterns for German invoice extraction.
//!
//! Fixed-shape patterns live here as statics. Vocabulary-driven patterns
//! (invoice-number labels, VAT keywords, legal-form suffixes, vendor
//! prefixes) are compiled by their extractors from configuration via the
//! alternation builders below.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Currency amounts: "1.234,56 €", "€ 1.234,56", "1234,56", "1234.56"
    pub static ref CURRENCY: Regex = Regex::new(
        r"€?\s*(\d{1,3}(?:[.\s]\d{3})*,\d{2}|\d+,\d{2}|\d+\.\d{2})\s*€?"
    ).unwrap();

    // Dates: DD.MM.YYYY, DD.MM.YY; day is digit-shape only, month 01-12
    pub static ref DATE_GERMAN: Regex = Regex::new(
        r"\b(\d{1,2}\.(?:0[1-9]|1[0-2])\.(?:\d{4}|\d{2}))\b"
    ).unwrap();
}

/// Escaped alternation of vocabulary tokens, longest first so specific
/// labels win over their own prefixes ("Rechnungsnummer" before "Rechnung").
///
/// An empty vocabulary yields a never-matching pattern.
pub fn alternation(tokens: &[String]) -> String {
    if tokens.is_empty() {
        return r"[^\s\S]".to_string();
    }

    let mut sorted: Vec<&String> = tokens.iter().collect();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    sorted
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}

/// Like [`alternation`], but each token is bounded as a whole word.
///
/// `\b` only asserts next to word characters, so the boundary is applied per
/// token edge; dotted forms like "e.V." still match before whitespace.
pub fn word_alternation(tokens: &[String]) -> String {
    if tokens.is_empty() {
        return r"[^\s\S]".to_string();
    }

    let mut sorted: Vec<&String> = tokens.iter().collect();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    sorted
        .iter()
        .map(|t| {
            let escaped = regex::escape(t);
            let lead = if t.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                r"\b"
            } else {
                ""
            };
            let trail = if t.chars().last().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                r"\b"
            } else {
                ""
            };
            format!("{}{}{}", lead, escaped, trail)
        })
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_currency_pattern_forms() {
        let captures: Vec<&str> = CURRENCY
            .captures_iter("Netto 1.234,56 € und 1234,56 sowie 1234.56")
            .map(|c| c.get(1).unwrap().as_str())
            .collect();

        assert_eq!(captures, vec!["1.234,56", "1234,56", "1234.56"]);
    }

    #[test]
    fn test_date_pattern_rejects_month_13() {
        assert!(DATE_GERMAN.is_match("15.12.2024"));
        assert!(!DATE_GERMAN.is_match("15.13.2024"));
    }

    #[test]
    fn test_alternation_prefers_longest() {
        let tokens = vec!["Rechnung".to_string(), "Rechnungsnummer".to_string()];
        let pattern = Regex::new(&format!("(?i)(?:{})", alternation(&tokens))).unwrap();

        assert_eq!(
            pattern.find("Rechnungsnummer: 1").unwrap().as_str(),
            "Rechnungsnummer"
        );
    }

    #[test]
    fn test_word_alternation_dotted_token() {
        let tokens = vec!["e.V.".to_string(), "AG".to_string()];
        let pattern = Regex::new(&word_alternation(&tokens)).unwrap();

        assert!(pattern.is_match("Förderverein e.V. Berlin"));
        assert!(pattern.is_match("Beispiel AG"));
        // "AG" embedded in a word is not a legal-form token
        assert!(!pattern.is_match("MAGENTA"));
    }

    #[test]
    fn test_empty_vocabulary_never_matches() {
        let pattern = Regex::new(&alternation(&[])).unwrap();
        assert!(!pattern.is_match("anything"));
    }
}
