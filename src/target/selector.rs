//! Per-dimension majority-share computation and tie-breaking (spec §4.3).
//!
//! Reuses the same effective-token precedence the per-item normalizer
//! already derives (`normalize::monetary::effective_source_currency`/
//! `effective_source_magnitude`, `normalize::time_basis::effective_source_time`)
//! rather than re-deriving it, so the selector and the normalizer never
//! disagree about what an item's "currency" or "time" actually is.

use std::collections::BTreeMap;

use crate::config::AutoTargetDimensions;
use crate::normalize::monetary::{effective_source_currency, effective_source_magnitude};
use crate::normalize::time_basis::effective_source_time;
use crate::types::{AutoTargetSelection, DimensionShares, Magnitude, ParsedObservation, TimeScale};

/// Which currency the tie-breaker prefers when no majority currency exists
/// (spec §4.3 `tieBreakers.currency`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyTieBreak {
    /// Prefer the pipeline's configured target currency if it appears in
    /// the group at all, else USD if it appears, else no selection.
    PreferTargetCurrency,
    /// Prefer USD if it appears, else the configured target currency if it
    /// appears, else no selection.
    PreferUsd,
}

/// Tie-breaker configuration passed to [`select_targets`]. Magnitude and
/// time tie-breakers are fixed by spec (`prefer-millions`, `prefer-month`)
/// and are not configurable (spec §4.3 Algorithm).
#[derive(Debug, Clone, Copy)]
pub struct TieBreakers {
    pub currency: CurrencyTieBreak,
}

impl Default for TieBreakers {
    fn default() -> Self {
        TieBreakers {
            currency: CurrencyTieBreak::PreferTargetCurrency,
        }
    }
}

/// Tallies `tokens` into a canonical-key share map plus the denominator
/// (spec §4.3 "tokens that are absent are excluded from the denominator").
fn shares_of<'a>(tokens: impl Iterator<Item = &'a str>) -> (DimensionShares, usize) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total = 0usize;
    for token in tokens {
        *counts.entry(token.to_string()).or_insert(0) += 1;
        total += 1;
    }
    let shares = counts
        .into_iter()
        .map(|(token, count)| (token, count as f64 / total as f64))
        .collect();
    (shares, total)
}

/// The highest-share token meeting `threshold`, if any (spec §4.3 "a
/// majority winner is any token with share >= threshold").
fn majority(shares: &DimensionShares, threshold: f64) -> Option<(String, f64)> {
    shares
        .iter()
        .filter(|(_, share)| **share >= threshold)
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(token, share)| (token.clone(), *share))
}

fn format_share(share: f64) -> String {
    format!("{share:.2}")
}

/// Computes an [`AutoTargetSelection`] for one indicator group (spec §4.3).
///
/// `group` is the set of parsed observations sharing an indicator key;
/// `dimensions` gates which of currency/magnitude/time are resolved at
/// all; `min_majority_share` is the majority threshold; `target_currency`
/// is the pipeline's explicit target currency, consulted only as a
/// tie-break candidate.
pub fn select_targets(
    indicator_key: &str,
    group: &[&ParsedObservation],
    dimensions: AutoTargetDimensions,
    min_majority_share: f64,
    tie_breakers: TieBreakers,
    target_currency: Option<&str>,
) -> AutoTargetSelection {
    let mut selection = AutoTargetSelection {
        indicator_key: indicator_key.to_string(),
        ..Default::default()
    };
    let mut reasons = Vec::new();

    if dimensions.currency {
        select_currency(group, min_majority_share, tie_breakers, target_currency, &mut selection, &mut reasons);
    }
    if dimensions.magnitude {
        select_magnitude(group, min_majority_share, &mut selection, &mut reasons);
    }
    if dimensions.time {
        select_time(group, min_majority_share, &mut selection, &mut reasons);
    }

    selection.reason = reasons.join("; ");
    selection
}

fn select_currency(
    group: &[&ParsedObservation],
    min_majority_share: f64,
    tie_breakers: TieBreakers,
    target_currency: Option<&str>,
    selection: &mut AutoTargetSelection,
    reasons: &mut Vec<String>,
) {
    let tokens: Vec<String> = group
        .iter()
        .filter_map(|item| effective_source_currency(item))
        .map(|code| code.to_uppercase())
        .collect();
    let (shares, total) = shares_of(tokens.iter().map(String::as_str));
    if total == 0 {
        return;
    }
    selection.currency_shares = shares.clone();

    if let Some((token, share)) = majority(&shares, min_majority_share) {
        selection.selected_currency = Some(token.clone());
        reasons.push(format!("currency=majority({}={})", token, format_share(share)));
        return;
    }

    let target_upper = target_currency.map(str::to_uppercase);
    let (chosen, rule) = match tie_breakers.currency {
        CurrencyTieBreak::PreferTargetCurrency => {
            if let Some(code) = target_upper.as_deref().filter(|c| shares.contains_key(*c)) {
                (Some(code.to_string()), "prefer-targetCurrency")
            } else if shares.contains_key("USD") {
                (Some("USD".to_string()), "prefer-targetCurrency")
            } else {
                (None, "prefer-targetCurrency")
            }
        }
        CurrencyTieBreak::PreferUsd => {
            if shares.contains_key("USD") {
                (Some("USD".to_string()), "prefer-USD")
            } else if let Some(code) = target_upper.as_deref().filter(|c| shares.contains_key(*c)) {
                (Some(code.to_string()), "prefer-USD")
            } else {
                (None, "prefer-USD")
            }
        }
    };
    selection.selected_currency = chosen;
    reasons.push(format!("currency=tie-break({rule})"));
}

fn select_magnitude(
    group: &[&ParsedObservation],
    min_majority_share: f64,
    selection: &mut AutoTargetSelection,
    reasons: &mut Vec<String>,
) {
    // `effective_source_magnitude` always resolves to at least `RawUnits`,
    // so this dimension never excludes an item from the denominator.
    let tokens: Vec<String> = group.iter().map(|item| effective_source_magnitude(item).to_string()).collect();
    let (shares, total) = shares_of(tokens.iter().map(String::as_str));
    if total == 0 {
        return;
    }
    selection.magnitude_shares = shares.clone();

    if let Some((token, share)) = majority(&shares, min_majority_share) {
        selection.selected_magnitude = Some(token.clone());
        reasons.push(format!("magnitude=majority({}={})", token, format_share(share)));
    } else {
        selection.selected_magnitude = Some(Magnitude::Millions.to_string());
        reasons.push("magnitude=tie-break(prefer-millions)".to_string());
    }
}

fn select_time(
    group: &[&ParsedObservation],
    min_majority_share: f64,
    selection: &mut AutoTargetSelection,
    reasons: &mut Vec<String>,
) {
    let tokens: Vec<String> = group.iter().filter_map(|item| effective_source_time(item)).map(|t| t.to_string()).collect();
    let (shares, total) = shares_of(tokens.iter().map(String::as_str));
    if total == 0 {
        return;
    }
    selection.time_shares = shares.clone();

    if let Some((token, share)) = majority(&shares, min_majority_share) {
        selection.selected_time = Some(token.clone());
        reasons.push(format!("time=majority({}={})", token, format_share(share)));
    } else {
        selection.selected_time = Some(TimeScale::Month.to_string());
        reasons.push("time=tie-break(prefer-month)".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::unit_parser::parse;
    use crate::types::{BucketKind, Observation};

    fn parsed(value: f64, unit: &str, currency: Option<&str>) -> ParsedObservation {
        let mut observation = Observation::new(value).with_unit(unit);
        observation.currency = currency.map(str::to_string);
        ParsedObservation {
            input_index: 0,
            parsed_unit: parse(&observation.unit),
            observation,
            bucket: BucketKind::MonetaryFlow,
        }
    }

    #[test]
    fn unanimous_currency_is_majority() {
        let items = vec![
            parsed(1.0, "USD Million", None),
            parsed(2.0, "USD Million", None),
            parsed(3.0, "USD Million", None),
        ];
        let refs: Vec<&ParsedObservation> = items.iter().collect();
        let selection = select_targets(
            "trade",
            &refs,
            AutoTargetDimensions::default(),
            0.5,
            TieBreakers::default(),
            None,
        );
        assert_eq!(selection.selected_currency.as_deref(), Some("USD"));
        assert!(selection.reason.contains("majority(USD=1.00)"));
        let sum: f64 = selection.currency_shares.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn currency_tie_break_prefers_target_currency() {
        let items = vec![
            parsed(1.0, "USD Million", None),
            parsed(2.0, "EUR Million", None),
        ];
        let refs: Vec<&ParsedObservation> = items.iter().collect();
        let selection = select_targets(
            "trade",
            &refs,
            AutoTargetDimensions::default(),
            0.51,
            TieBreakers::default(),
            Some("EUR"),
        );
        assert_eq!(selection.selected_currency.as_deref(), Some("EUR"));
        assert!(selection.reason.contains("tie-break(prefer-targetCurrency)"));
    }

    #[test]
    fn magnitude_majority_picked_over_tie_break() {
        let items = vec![
            parsed(1.0, "USD Million", None),
            parsed(2.0, "USD Million", None),
            parsed(3.0, "USD Thousand", None),
        ];
        let refs: Vec<&ParsedObservation> = items.iter().collect();
        let selection = select_targets(
            "trade",
            &refs,
            AutoTargetDimensions::default(),
            0.5,
            TieBreakers::default(),
            None,
        );
        assert_eq!(selection.selected_magnitude.as_deref(), Some("millions"));
    }

    #[test]
    fn absent_dimension_excluded_from_denominator() {
        let items = vec![parsed(1.0, "USD Million", None), parsed(2.0, "USD", None)];
        let refs: Vec<&ParsedObservation> = items.iter().collect();
        let selection = select_targets(
            "trade",
            &refs,
            AutoTargetDimensions::default(),
            0.5,
            TieBreakers::default(),
            None,
        );
        // Both items resolve a magnitude token (RawUnits for the bare "USD"),
        // so the denominator is 2, not 1.
        let sum: f64 = selection.magnitude_shares.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
