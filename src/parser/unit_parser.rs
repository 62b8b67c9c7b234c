//! The unit lexicon & parser (spec §4.1).
//!
//! [`parse`] is deterministic and total: it never fails, and an
//! unrecognized input simply yields [`Category::Unknown`] — "ambiguous
//! inputs bias toward unknown category. Parser output is advisory;
//! downstream classification still runs."

use crate::parser::currency_codes;
use crate::parser::patterns::{
    COMPOUND_PHYSICAL_PATTERN, COUNT_PATTERN, ENERGY_PATTERN, INDEX_PATTERN, MAGNITUDE_PATTERNS,
    PERCENTAGE_PATTERN, PHYSICAL_PATTERN, POPULATION_PATTERN, RATIO_PATTERN, TEMPERATURE_PATTERN,
    TIME_PATTERNS,
};
use crate::types::{Category, Magnitude, ParsedUnit, TimeScale};

/// Tokenizes and classifies a free-form unit string.
///
/// Applies, in order: currency-code detection, magnitude pattern match
/// (skipping compound physical forms), time pattern match, percentage
/// (override), energy, physical, index, count, then ratio detection.
pub fn parse(unit: &str) -> ParsedUnit {
    let trimmed = unit.trim();
    if trimmed.is_empty() {
        return ParsedUnit::unknown(unit);
    }

    let mut components = std::collections::BTreeMap::new();

    let currency = detect_currency(trimmed);
    if let Some(code) = currency {
        components.insert("currency".to_string(), code.to_string());
    }

    let is_compound_physical = COMPOUND_PHYSICAL_PATTERN.is_match(trimmed);
    let magnitude = if is_compound_physical {
        None
    } else {
        detect_magnitude(trimmed)
    };
    if let Some(m) = magnitude {
        components.insert("magnitude".to_string(), m.to_string());
    }

    let time_scale = detect_time(trimmed);
    if let Some(t) = time_scale {
        components.insert("time".to_string(), t.to_string());
    }

    // Ratio detection: "<CUR>/<denominator>" or "<CUR> per <denominator>".
    // Only a currency-shaped numerator counts as a composite ratio unit
    // (spec §4.1: "Detection of a ratio with currency numerator marks the
    // unit composite").
    let ratio = RATIO_PATTERN.captures(trimmed).and_then(|caps| {
        let numerator = &caps[1];
        currency_codes::lookup(numerator).map(|code| (code, caps[2].trim().to_string()))
    });
    if let Some((code, denom)) = &ratio {
        components.insert("currency".to_string(), code.to_string());
        components.insert("denominator".to_string(), denom.clone());
    }

    let is_ratio = ratio.is_some();
    let currency = currency.or(ratio.as_ref().map(|(c, _)| *c));

    // Explicit currency + time also yields a composite flow unit (spec
    // §4.1: "Explicit currency+time yields composite (flow)").
    let is_composite = is_ratio || (currency.is_some() && time_scale.is_some());

    let category = classify_category(trimmed, currency, time_scale, is_ratio);

    ParsedUnit {
        original: unit.to_string(),
        category,
        currency: currency.map(|c| c.to_string()),
        magnitude,
        time_scale,
        is_composite,
        components,
    }
}

fn classify_category(
    text: &str,
    currency: Option<&'static str>,
    time_scale: Option<TimeScale>,
    is_ratio: bool,
) -> Category {
    if PERCENTAGE_PATTERN.is_match(text) {
        return Category::Percentage;
    }
    if is_ratio {
        return Category::Composite;
    }
    if currency.is_some() && time_scale.is_some() {
        return Category::Composite;
    }
    if currency.is_some() {
        return Category::Currency;
    }
    if ENERGY_PATTERN.is_match(text) {
        return Category::Energy;
    }
    if TEMPERATURE_PATTERN.is_match(text) {
        return Category::Temperature;
    }
    if PHYSICAL_PATTERN.is_match(text) {
        return Category::Physical;
    }
    if INDEX_PATTERN.is_match(text) {
        return Category::Index;
    }
    if POPULATION_PATTERN.is_match(text) {
        return Category::Population;
    }
    if COUNT_PATTERN.is_match(text) {
        return Category::Count;
    }
    if time_scale.is_some() {
        return Category::Time;
    }
    Category::Unknown
}

fn detect_currency(text: &str) -> Option<&'static str> {
    text.split(|c: char| !c.is_alphanumeric())
        .find_map(currency_codes::lookup)
}

fn detect_magnitude(text: &str) -> Option<Magnitude> {
    MAGNITUDE_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, m)| *m)
}

fn detect_time(text: &str) -> Option<TimeScale> {
    TIME_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, t)| *t)
}

/// Maps an explicit scale string (e.g. `"Thousands"`, `"Billions"`) to its
/// canonical [`Magnitude`], independent of unit-string inference.
///
/// Per spec §4.1: "A helper extracts effective magnitude from the
/// explicit scale field when present, overriding the unit-string
/// inference." Used by normalizers to prefer `Observation.scale` over
/// whatever [`parse`] inferred from the unit text.
pub fn magnitude_from_explicit_scale(scale: &str) -> Option<Magnitude> {
    detect_magnitude(scale)
}

/// Maps an explicit periodicity string (e.g. `"Monthly"`, `"Quarterly"`)
/// to its canonical [`TimeScale`].
pub fn time_scale_from_explicit_periodicity(periodicity: &str) -> Option<TimeScale> {
    detect_time(periodicity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_currency_magnitude() {
        let p = parse("AUD Million");
        assert_eq!(p.category, Category::Currency);
        assert_eq!(p.currency.as_deref(), Some("AUD"));
        assert_eq!(p.magnitude, Some(Magnitude::Millions));
        assert!(p.time_scale.is_none());
        assert!(!p.is_composite);
    }

    #[test]
    fn parses_currency_with_time_as_composite_flow() {
        let p = parse("USD Thousand per quarter");
        assert_eq!(p.category, Category::Composite);
        assert_eq!(p.currency.as_deref(), Some("USD"));
        assert_eq!(p.magnitude, Some(Magnitude::Thousands));
        assert_eq!(p.time_scale, Some(TimeScale::Quarter));
        assert!(p.is_composite);
    }

    #[test]
    fn parses_ratio_unit_with_currency_numerator() {
        let p = parse("USD/Liter");
        assert_eq!(p.category, Category::Composite);
        assert!(p.is_composite);
        assert_eq!(p.components.get("denominator"), Some(&"Liter".to_string()));
    }

    #[test]
    fn skips_compound_physical_magnitude() {
        let p = parse("Thousand Tonnes");
        assert_eq!(p.magnitude, None);
        assert_eq!(p.category, Category::Physical);
    }

    #[test]
    fn percentage_overrides_other_detections() {
        let p = parse("% of GDP");
        assert_eq!(p.category, Category::Percentage);
    }

    #[test]
    fn empty_unit_is_unknown() {
        let p = parse("");
        assert_eq!(p.category, Category::Unknown);
    }

    #[test]
    fn unrecognized_unit_is_unknown_not_an_error() {
        let p = parse("Zorkmids");
        assert_eq!(p.category, Category::Unknown);
    }

    #[test]
    fn explicit_scale_helper_overrides_inference() {
        assert_eq!(magnitude_from_explicit_scale("Billions"), Some(Magnitude::Billions));
        assert_eq!(magnitude_from_explicit_scale("garbage"), None);
    }
}
