//! Passthrough domains (spec §4.8): percentage, index, energy, commodity,
//! agriculture, metals, crypto, ratio. No value or unit change.

use crate::normalize::monetary::NormalizeOutcome;
use crate::types::{BucketKind, Explain, ParsedObservation};

pub fn normalize(item: &ParsedObservation) -> NormalizeOutcome {
    let mut explain = Explain::new();
    explain.domain = Some(item.bucket.domain_tag().to_string());
    explain.note = Some(if item.bucket == BucketKind::Ratios {
        "no-op normalization (guarded ratio)".to_string()
    } else {
        "no-op normalization".to_string()
    });

    NormalizeOutcome {
        normalized_value: Some(item.observation.value),
        normalized_unit: Some(item.observation.unit.clone()),
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
    fn gwh_energy_passes_through_unchanged() {
        let observation = Observation::new(1200.0).with_name("Electricity Production").with_unit("GWh");
        let item = classify(&[observation], &ClassifierRules::default()).remove(0);
        let outcome = normalize(&item);
        assert_eq!(outcome.normalized_value, Some(1200.0));
        assert_eq!(outcome.normalized_unit.as_deref(), Some("GWh"));
        assert_eq!(outcome.explain.domain.as_deref(), Some("energy"));
    }

    #[test]
    fn ratio_note_mentions_guarded_ratio() {
        let observation = Observation::new(1.35).with_name("Fuel Price").with_unit("USD/Liter");
        let item = classify(&[observation], &ClassifierRules::default()).remove(0);
        let outcome = normalize(&item);
        assert!(outcome.explain.note.unwrap().contains("guarded ratio"));
    }
}
