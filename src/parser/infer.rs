//! Unit inference from context (spec §6 `inferUnits`): when an
//! observation's unit string is empty, derive one from its description or
//! name, accepting the inference only above a confidence threshold.

use crate::parser::currency_codes;
use crate::parser::patterns::PERCENTAGE_PATTERN;

/// Scans `description` then `name` for a recognizable currency code or a
/// percentage marker, returning the inferred unit text plus a confidence
/// in `[0.0, 1.0]`. Callers accept the inference only when confidence
/// exceeds the configured threshold (spec §6: "accepting the inference
/// at confidence > 0.7").
pub fn infer_unit_from_context(description: Option<&str>, name: Option<&str>) -> Option<(String, f64)> {
    for text in [description, name].into_iter().flatten() {
        if PERCENTAGE_PATTERN.is_match(text) {
            return Some(("%".to_string(), 0.9));
        }
        if let Some(code) = text
            .split(|c: char| !c.is_alphanumeric())
            .find_map(currency_codes::lookup)
        {
            return Some((code.to_string(), 0.75));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_percentage_from_description() {
        let (unit, confidence) = infer_unit_from_context(Some("reported as a percentage of GDP"), None).unwrap();
        assert_eq!(unit, "%");
        assert!(confidence > 0.7);
    }

    #[test]
    fn infers_currency_from_name() {
        let (unit, confidence) = infer_unit_from_context(None, Some("USD Trade Balance")).unwrap();
        assert_eq!(unit, "USD");
        assert!(confidence > 0.7);
    }

    #[test]
    fn no_recognizable_token_yields_none() {
        assert!(infer_unit_from_context(Some("something unrelated"), Some("mystery metric")).is_none());
    }
}
