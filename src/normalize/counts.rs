//! Counts normalizer (spec §4.7): magnitude scaling only, to `ones`. Never
//! FX or time.

use crate::normalize::monetary::NormalizeOutcome;
use crate::parser;
use crate::types::{
    ConversionDirection, ConversionExplain, ConversionStep, Explain, Magnitude, MagnitudeExplain,
    ParsedObservation, UnitsExplain,
};

pub fn normalize(item: &ParsedObservation) -> NormalizeOutcome {
    let mut explain = Explain::new();
    explain.domain = Some("count".to_string());

    let source_magnitude = item
        .observation
        .scale
        .as_deref()
        .and_then(parser::magnitude_from_explicit_scale)
        .or(item.parsed_unit.magnitude)
        .unwrap_or(Magnitude::RawUnits);

    let factor = source_magnitude.factor_to(Magnitude::RawUnits);
    let value = item.observation.value * factor;

    explain.magnitude = Some(MagnitudeExplain {
        original_scale: Some(source_magnitude.to_string()),
        target_scale: Some(Magnitude::RawUnits.to_string()),
        factor,
        direction: if factor > 1.0 {
            ConversionDirection::Upscale
        } else if factor < 1.0 {
            ConversionDirection::Downscale
        } else {
            ConversionDirection::None
        },
        description: format!("{source_magnitude} -> {}", Magnitude::RawUnits),
    });

    let steps = if factor != 1.0 {
        vec![ConversionStep {
            kind: "scale".to_string(),
            factor,
            description: format!("scaled from {source_magnitude} to ones"),
        }]
    } else {
        Vec::new()
    };
    explain.conversion = Some(ConversionExplain {
        summary: format!("applied {} step(s)", steps.len()),
        total_factor: factor,
        steps,
    });
    explain.units = Some(UnitsExplain {
        original_unit: item.observation.unit.clone(),
        normalized_unit: "ones".to_string(),
        original_full_unit: item.observation.unit.clone(),
        normalized_full_unit: "ones".to_string(),
    });

    NormalizeOutcome {
        normalized_value: Some(value),
        normalized_unit: Some("ones".to_string()),
        explain,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, ClassifierRules};
    use crate::types::Observation;

    #[test]
    fn thousand_units_scales_to_ones() {
        let observation = Observation::new(6774.0).with_name("Tourist Arrivals").with_unit("Thousand Units");
        let item = classify(&[observation], &ClassifierRules::default()).remove(0);
        let outcome = normalize(&item);
        assert_eq!(outcome.normalized_value, Some(6_774_000.0));
        assert_eq!(outcome.normalized_unit.as_deref(), Some("ones"));
    }

    #[test]
    fn millions_of_persons_scales_by_a_million() {
        let observation = Observation::new(2.5).with_name("Population").with_unit("Millions of persons");
        let item = classify(&[observation], &ClassifierRules::default()).remove(0);
        let outcome = normalize(&item);
        assert_eq!(outcome.normalized_value, Some(2_500_000.0));
    }
}
