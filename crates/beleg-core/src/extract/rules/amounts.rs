//! Currency amount matching and normalization.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::CURRENCY;
use super::{FieldExtractor, FieldMatch};

/// Currency amount extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = FieldMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CURRENCY
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1).unwrap();
                parse_german_amount(m.as_str())
                    .map(|amount| FieldMatch::new(amount, m.as_str(), (m.start(), m.end())))
            })
            .collect()
    }
}

/// Parse a German-formatted amount to a decimal.
///
/// Handles "1.234,56", "1234,56" and "1234.56"; a comma marks the decimal
/// separator, in which case dots and embedded spaces are thousands
/// separators.
pub fn parse_german_amount(value: &str) -> Option<Decimal> {
    let value = value.replace('€', "");
    let value = value.trim();

    let normalized = if value.contains(',') {
        value.replace(['.', ' '], "").replace(',', ".")
    } else {
        value.replace(' ', "")
    };

    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_german_amount() {
        assert_eq!(parse_german_amount("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_german_amount("1234,56"), Some(dec("1234.56")));
        assert_eq!(parse_german_amount("1234.56"), Some(dec("1234.56")));
        assert_eq!(parse_german_amount("12.345.678,90"), Some(dec("12345678.90")));
        assert_eq!(parse_german_amount("1 234,56"), Some(dec("1234.56")));
    }

    #[test]
    fn test_parse_strips_currency_symbol() {
        assert_eq!(parse_german_amount("€ 99,00"), Some(dec("99.00")));
        assert_eq!(parse_german_amount("99,00 €"), Some(dec("99.00")));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_german_amount(""), None);
        assert_eq!(parse_german_amount("abc"), None);
    }

    #[test]
    fn test_extract_all_amounts() {
        let extractor = AmountExtractor::new();
        let text = "Zwischensumme: 100,00 €\nMwSt: 19,00 €\nGesamt: 119,00 €";

        let amounts: Vec<Decimal> = extractor
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();

        assert_eq!(amounts, vec![dec("100.00"), dec("19.00"), dec("119.00")]);
    }

    #[test]
    fn test_extract_keeps_document_order() {
        let extractor = AmountExtractor::new();
        let text = "Gesamt 1.190,00 € davon netto 1000,00";

        let first = extractor.extract(text).unwrap();
        assert_eq!(first.value, dec("1190.00"));
        assert_eq!(first.source, "1.190,00");
    }
}
