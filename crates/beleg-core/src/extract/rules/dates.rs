//! Date matching and normalization.

use chrono::NaiveDate;

use super::patterns::DATE_GERMAN;
use super::{FieldExtractor, FieldMatch};

/// Date candidate extractor.
///
/// Yields raw `DD.MM.YYYY` / `DD.MM.YY` candidates; whether a candidate is
/// an actual calendar date is decided by [`normalize_german_date`].
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = FieldMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_GERMAN
            .captures_iter(text)
            .map(|caps| {
                let m = caps.get(1).unwrap();
                FieldMatch::new(m.as_str().to_string(), m.as_str(), (m.start(), m.end()))
            })
            .collect()
    }
}

/// Parse a German date candidate.
///
/// A trailing 4-digit group is parsed as a full year, a 2-digit group with
/// chrono's standard century pivot (00-68 are the 2000s).
pub fn normalize_german_date(date_str: &str) -> Option<NaiveDate> {
    let year_len = date_str.rsplit('.').next()?.len();

    if year_len == 4 {
        NaiveDate::parse_from_str(date_str, "%d.%m.%Y").ok()
    } else {
        NaiveDate::parse_from_str(date_str, "%d.%m.%y").ok()
    }
}

/// Render a date in canonical `DD.MM.YYYY` form.
pub fn format_german_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_normalize_full_year() {
        assert_eq!(
            normalize_german_date("05.03.2024"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn test_normalize_two_digit_year() {
        assert_eq!(
            normalize_german_date("05.03.24"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn test_canonical_form_is_idempotent() {
        let short = normalize_german_date("05.03.24").unwrap();
        let long = normalize_german_date("05.03.2024").unwrap();

        assert_eq!(format_german_date(short), "05.03.2024");
        assert_eq!(format_german_date(long), "05.03.2024");
    }

    #[test]
    fn test_impossible_date_is_rejected() {
        // Matches the digit shape but is no calendar date
        assert_eq!(normalize_german_date("31.02.2024"), None);
    }

    #[test]
    fn test_extract_all_in_document_order() {
        let extractor = DateExtractor::new();
        let text = "Rechnungsdatum: 15.03.2024\nLieferdatum: 01.03.2024";

        let dates: Vec<String> = extractor
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();

        assert_eq!(dates, vec!["15.03.2024", "01.03.2024"]);
    }

    #[test]
    fn test_month_out_of_range_not_matched() {
        let extractor = DateExtractor::new();
        assert!(extractor.extract("Datum: 15.13.2024").is_none());
    }
}
