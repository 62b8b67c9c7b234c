//! Routes a classified item to its domain normalizer (spec §4.5–§4.8).

use crate::normalize::monetary::{self, MonetaryTargets, NormalizeOutcome};
use crate::normalize::{counts, passthrough, wages};
use crate::types::{BucketKind, Explain, FxTable, ParsedObservation};

/// Everything a single item's normalization needs beyond its own parsed
/// state: the resolved targets and the FX table for the run (if any).
#[derive(Debug, Clone, Default)]
pub struct NormalizeContext {
    pub targets: MonetaryTargets,
    pub exclude_index_values: bool,
}

/// Normalizes one item, routing by [`BucketKind`] (spec §2 data flow
/// "[per bucket] domain normalizer").
pub fn normalize_item(item: &ParsedObservation, ctx: &NormalizeContext, fx: Option<&FxTable>) -> NormalizeOutcome {
    match item.bucket {
        BucketKind::MonetaryFlow => monetary::normalize(item, &ctx.targets, fx, true),
        BucketKind::MonetaryStock => monetary::normalize(item, &ctx.targets, fx, false),
        BucketKind::Wages => {
            match wages::normalize(item, ctx.targets.currency.as_deref(), fx, ctx.exclude_index_values) {
                Some(outcome) => outcome,
                None => unclassified_outcome(item, "excluded by excludeIndexValues"),
            }
        }
        BucketKind::Counts => counts::normalize(item),
        BucketKind::Percentages
        | BucketKind::Indices
        | BucketKind::Energy
        | BucketKind::Commodities
        | BucketKind::Agriculture
        | BucketKind::Metals
        | BucketKind::Crypto
        | BucketKind::Ratios => passthrough::normalize(item),
        BucketKind::Exempt => exempt_outcome(item),
        BucketKind::Unknown => unclassified_outcome(item, "unit/category could not be classified"),
    }
}

fn exempt_outcome(item: &ParsedObservation) -> NormalizeOutcome {
    let mut explain = Explain::new();
    explain.domain = Some("exempt".to_string());
    explain.note = Some("exempt from classification; passed through unchanged".to_string());
    NormalizeOutcome {
        normalized_value: Some(item.observation.value),
        normalized_unit: Some(item.observation.unit.clone()),
        explain,
        warnings: Vec::new(),
    }
}

fn unclassified_outcome(item: &ParsedObservation, reason: &str) -> NormalizeOutcome {
    let mut explain = Explain::new();
    explain.domain = Some(item.bucket.domain_tag().to_string());
    explain.note = Some(reason.to_string());
    NormalizeOutcome {
        normalized_value: None,
        normalized_unit: None,
        explain,
        warnings: vec![format!("item {}: {}", item.input_index, reason)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, ClassifierRules};
    use crate::types::{Magnitude, Observation, TimeScale};

    #[test]
    fn routes_monetary_flow_through_monetary_normalizer() {
        let observation = Observation::new(100.0)
            .with_name("Exports")
            .with_unit("USD Million per month")
            .with_currency("USD");
        let item = classify(&[observation], &ClassifierRules::default()).remove(0);
        let ctx = NormalizeContext {
            targets: MonetaryTargets {
                currency: Some("USD".to_string()),
                magnitude: Some(Magnitude::Millions),
                time: Some(TimeScale::Month),
            },
            exclude_index_values: false,
        };
        let outcome = normalize_item(&item, &ctx, None);
        assert_eq!(outcome.normalized_value, Some(100.0));
    }

    #[test]
    fn unknown_bucket_leaves_fields_unset() {
        let observation = Observation::new(1.0).with_name("Mystery Metric").with_unit("Zorkmids");
        let item = classify(&[observation], &ClassifierRules::default()).remove(0);
        let outcome = normalize_item(&item, &NormalizeContext::default(), None);
        assert!(outcome.normalized_value.is_none());
        assert!(!outcome.warnings.is_empty());
    }
}
