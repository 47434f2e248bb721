//! Vendor archive key derivation.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref SEPARATOR_RUN: Regex = Regex::new(r"[\s-]+").unwrap();
}

/// Derive the filesystem-safe archive folder key for a vendor name.
///
/// Lowercases, folds German umlauts (ä→ae, ö→oe, ü→ue, ß→ss), strips
/// non-word characters, collapses whitespace/hyphen runs to a single
/// underscore and trims leading/trailing underscores. An empty result
/// becomes `"unknown_vendor"`.
pub fn vendor_key(vendor: &str) -> String {
    let mut folded = String::with_capacity(vendor.len());
    for c in vendor.chars() {
        match c {
            'ä' | 'Ä' => folded.push_str("ae"),
            'ö' | 'Ö' => folded.push_str("oe"),
            'ü' | 'Ü' => folded.push_str("ue"),
            'ß' => folded.push_str("ss"),
            _ => folded.push(c),
        }
    }

    let lowered = folded.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    let collapsed = SEPARATOR_RUN.replace_all(&stripped, "_");
    let key = collapsed.trim_matches('_');

    if key.is_empty() {
        "unknown_vendor".to_string()
    } else {
        key.to_string()
    }
}
