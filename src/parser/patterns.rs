//! Lexical pattern tables used by [`crate::parser::unit_parser`].
//!
//! Each detector is a module-level `LazyLock<Regex>` compiled once at
//! first use (spec §5: "custom-unit lexicons...loaded once at module
//! initialization; they are read-only thereafter"). Keeping these as data
//! (a table of `(Regex, value)` pairs) rather than a chain of `if`/`match`
//! branches is what lets a domain pack (emissions, agriculture, metals)
//! extend the lexicon without editing the detection control flow
//! (REDESIGN FLAGS).

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Magnitude, TimeScale};

/// Magnitude word -> canonical [`Magnitude`]. Order matters: longer/more
/// specific patterns are tried first so "hundred thousand" style compounds
/// don't get clipped by a shorter match.
pub static MAGNITUDE_PATTERNS: LazyLock<Vec<(Regex, Magnitude)>> = LazyLock::new(|| {
    vec![
        (re(r"(?i)\btrillions?\b"), Magnitude::Trillions),
        (re(r"(?i)\bbillions?\b"), Magnitude::Billions),
        (re(r"(?i)\bmillions?\b"), Magnitude::Millions),
        (re(r"(?i)\bthousands?\b"), Magnitude::Thousands),
        (re(r"(?i)\bhundreds?\b"), Magnitude::Hundreds),
    ]
});

/// Compound physical forms like "thousand tonnes" or "million barrels"
/// that must NOT be treated as a pure magnitude scale — the magnitude
/// word here qualifies a physical quantity, not a monetary value (spec
/// §4.1 "skipping compound physical forms").
pub static COMPOUND_PHYSICAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b(?:thousand|million|billion|trillion|hundred)s?\s+(?:tonnes?|tons?|barrels?|bbl|bushels?|oz|ounces?|liters?|litres?|gallons?|kwh|mwh|gwh)\b")
});

pub static TIME_PATTERNS: LazyLock<Vec<(Regex, TimeScale)>> = LazyLock::new(|| {
    vec![
        (re(r"(?i)\b(?:per\s+)?hour(?:ly)?\b"), TimeScale::Hour),
        (re(r"(?i)\b(?:per\s+)?day(?:ly)?\b"), TimeScale::Day),
        (re(r"(?i)\b(?:per\s+)?week(?:ly)?\b"), TimeScale::Week),
        (re(r"(?i)\b(?:per\s+)?month(?:ly)?\b"), TimeScale::Month),
        (re(r"(?i)\b(?:per\s+)?quarter(?:ly)?\b"), TimeScale::Quarter),
        (re(r"(?i)\b(?:per\s+)?(?:year|annum)(?:ly)?\b"), TimeScale::Year),
    ]
});

pub static PERCENTAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)(%|percent|percentage|pct)"));

pub static INDEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(index|points?|idx)\b"));

pub static ENERGY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(gwh|mwh|kwh|terajoules?|tj|btu|mtoe|toe)\b"));

pub static TEMPERATURE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)(°c|°f|celsius|fahrenheit|degrees?)"));

pub static POPULATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(persons?|people|population|inhabitants?|capita)\b"));

pub static COUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b(units?|registrations?|dwellings?|permits?|vehicles?|companies|firms?|establishments?)\b")
});

pub static PHYSICAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b(tonnes?|tons?|kg|kilograms?|liters?|litres?|gallons?|barrels?|bbl|bushels?|oz|ounces?|sq\s*m|hectares?|acres?)\b")
});

/// Matches a ratio unit of the shape "<CUR>/<denominator>" or
/// "<CUR> per <denominator>" (spec §4.1). Captures the denominator text.
pub static RATIO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)^([A-Za-z]{2,6})\s*(?:/|\bper\b)\s*([A-Za-z][A-Za-z ]*)$"));

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern is valid regex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_patterns_match_expected_words() {
        assert!(MAGNITUDE_PATTERNS.iter().any(|(r, m)| r.is_match("Million") && *m == Magnitude::Millions));
        assert!(MAGNITUDE_PATTERNS.iter().any(|(r, m)| r.is_match("Thousands") && *m == Magnitude::Thousands));
    }

    #[test]
    fn compound_physical_pattern_catches_thousand_tonnes() {
        assert!(COMPOUND_PHYSICAL_PATTERN.is_match("Thousand Tonnes"));
        assert!(!COMPOUND_PHYSICAL_PATTERN.is_match("Thousand USD"));
    }

    #[test]
    fn ratio_pattern_splits_numerator_and_denominator() {
        let caps = RATIO_PATTERN.captures("USD/Liter").unwrap();
        assert_eq!(&caps[1], "USD");
        assert_eq!(&caps[2], "Liter");

        let caps = RATIO_PATTERN.captures("USD per Hour").unwrap();
        assert_eq!(&caps[1], "USD");
        assert_eq!(&caps[2], "Hour");
    }
}
