//! Amount reconciliation: deciding which candidates are net, VAT and gross.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::debug;

use super::rules::FieldMatch;

/// Outcome of reconciling the amount candidates of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountBreakdown {
    /// Net amount (before VAT).
    pub net: Option<Decimal>,
    /// VAT amount.
    pub vat_amount: Option<Decimal>,
    /// Gross amount (after VAT).
    pub gross: Option<Decimal>,
    /// Whether the single-candidate fallback computed net and VAT.
    pub single_candidate: bool,
}

/// Prepare reconciliation input: the de-duplicated, ascending-sorted set of
/// all positive candidates.
pub fn candidate_amounts(matches: &[FieldMatch<Decimal>]) -> Vec<Decimal> {
    matches
        .iter()
        .map(|m| m.value)
        .filter(|v| *v > Decimal::ZERO)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Decide net, VAT and gross from the sorted candidates.
///
/// Policy by candidate count:
/// - 3 or more: gross is the maximum; net is the first candidate (ascending)
///   within `tolerance_percent` of the expected net derived from the VAT
///   rate, else the second-largest candidate. First match wins over closest
///   match; that tie-break is a load-bearing business rule.
/// - exactly 1: the candidate is the gross; net and VAT are computed from
///   the rate, flagged via `single_candidate`.
/// - 0 or exactly 2: nothing is assigned and the caller reports missing
///   amount data. The two-candidate case looks like a gap, but its behavior
///   is intentional and must not be "fixed" here.
pub fn reconcile_amounts(
    candidates: &[Decimal],
    vat_rate: u8,
    tolerance_percent: u8,
) -> AmountBreakdown {
    let mut result = AmountBreakdown::default();
    let divisor = Decimal::ONE + Decimal::from(vat_rate) / Decimal::ONE_HUNDRED;

    match candidates.len() {
        0 | 2 => {}
        1 => {
            let gross = candidates[0];
            let net = (gross / divisor).round_dp(2);

            result.gross = Some(gross);
            result.net = Some(net);
            result.vat_amount = Some(gross - net);
            result.single_candidate = true;
        }
        n => {
            let gross = candidates[n - 1];
            let expected_net = gross / divisor;
            let tolerance = expected_net * Decimal::from(tolerance_percent) / Decimal::ONE_HUNDRED;

            let net = candidates
                .iter()
                .find(|amt| (**amt - expected_net).abs() < tolerance)
                .copied()
                .or_else(|| {
                    debug!(%expected_net, "no candidate within tolerance, assuming second-largest is net");
                    (n >= 2).then(|| candidates[n - 2])
                });

            result.gross = Some(gross);
            result.net = net;
            result.vat_amount = net.map(|net| gross - net);
        }
    }

    result
}
