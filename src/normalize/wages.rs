//! Wages specialization (spec §4.6): a monetary-flow variant that always
//! outputs `"<targetCurrency> per month"`.

use crate::normalize::monetary::NormalizeOutcome;
use crate::normalize::time_basis::{
    self, WAGES_HOURS_PER_MONTH, WAGES_QUARTERS_PER_MONTH_FACTOR, WAGES_WEEKS_PER_MONTH,
    WAGES_YEARS_PER_MONTH_FACTOR,
};
use crate::types::{
    Category, ConversionDirection, ConversionExplain, ConversionStep, CurrencyExplain, Explain,
    FxExplain, FxTable, ParsedObservation, PeriodicityExplain, TimeScale,
};

/// The fixed hour/week/quarter/year -> month multiplier the wages path
/// uses, distinct from the general seconds-based chain (spec §9 Open
/// Question (i)). Day is not named by the spec; it falls back to the
/// general seconds-based ratio between day and month.
fn wages_to_month_factor(source: TimeScale) -> f64 {
    match source {
        TimeScale::Hour => WAGES_HOURS_PER_MONTH,
        TimeScale::Week => WAGES_WEEKS_PER_MONTH,
        TimeScale::Quarter => WAGES_QUARTERS_PER_MONTH_FACTOR,
        TimeScale::Year => WAGES_YEARS_PER_MONTH_FACTOR,
        TimeScale::Month => 1.0,
        TimeScale::Day => time_basis::seconds_per_unit(TimeScale::Month) / time_basis::seconds_per_unit(TimeScale::Day),
    }
}

/// Normalizes one wages item toward `target_currency` (always "per
/// month"). Returns `None` when `exclude_index_values` is set and the
/// item's parsed category is an index — the item is dropped from
/// normalization (caller keeps the slot with unset normalized fields).
pub fn normalize(
    item: &ParsedObservation,
    target_currency: Option<&str>,
    fx: Option<&FxTable>,
    exclude_index_values: bool,
) -> Option<NormalizeOutcome> {
    if exclude_index_values && item.parsed_unit.category == Category::Index {
        return None;
    }

    let mut explain = Explain::new();
    explain.domain = Some("wages".to_string());
    let mut warnings = Vec::new();
    let mut steps = Vec::new();

    let mut value = item.observation.value;

    let source_time = time_basis::effective_source_time(item);
    if let Some(source) = source_time {
        let multiplier = wages_to_month_factor(source);
        if multiplier != 1.0 {
            value *= multiplier;
            steps.push(ConversionStep {
                kind: "time".to_string(),
                factor: multiplier,
                description: format!("{source} -> month (wages constant {multiplier:.4})"),
            });
        }
        explain.periodicity = Some(PeriodicityExplain {
            original: Some(source.to_string()),
            target: Some(TimeScale::Month.to_string()),
            adjusted: multiplier != 1.0,
            factor: multiplier,
            direction: if multiplier > 1.0 {
                ConversionDirection::Upsample
            } else if multiplier < 1.0 {
                ConversionDirection::Downsample
            } else {
                ConversionDirection::None
            },
            description: format!("{source} -> month"),
        });
    } else {
        explain.periodicity = Some(PeriodicityExplain {
            original: None,
            target: Some(TimeScale::Month.to_string()),
            adjusted: false,
            factor: 1.0,
            direction: ConversionDirection::None,
            description: "No source time scale available".to_string(),
        });
        warnings.push("no source time scale available for wages item; time dimension left unconverted".to_string());
    }

    let source_currency = item
        .observation
        .currency
        .clone()
        .or_else(|| item.parsed_unit.currency.clone());
    explain.currency = Some(CurrencyExplain {
        original: source_currency.clone(),
        normalized: target_currency.map(|c| c.to_string()),
    });

    let mut fx_factor = 1.0;
    if let (Some(src), Some(tgt)) = (&source_currency, target_currency) {
        if !src.eq_ignore_ascii_case(tgt) {
            match fx {
                Some(table) => match table.convert(value, src, tgt) {
                    Some(converted) => {
                        fx_factor = table.rate(src).unwrap_or(1.0) / table.rate(tgt).unwrap_or(1.0);
                        value = converted;
                        explain.fx = Some(FxExplain {
                            currency: src.clone(),
                            base: table.base.clone(),
                            rate: table.rate(src).unwrap_or(1.0),
                            source: table.source.to_string(),
                            source_id: table.source_id.clone(),
                            as_of: table.as_of,
                        });
                        steps.push(ConversionStep {
                            kind: "currency".to_string(),
                            factor: fx_factor,
                            description: format!("converted {src} -> {tgt}"),
                        });
                    }
                    None => {
                        warnings.push(format!("fx table is missing a rate for '{src}' or '{tgt}'; skipped conversion"));
                    }
                },
                None => warnings.push("no fx table available; skipped currency conversion".to_string()),
            }
        }
    }

    let normalized_unit = format!("{} per month", target_currency.unwrap_or(source_currency.as_deref().unwrap_or("")));
    explain.units = Some(crate::types::UnitsExplain {
        original_unit: item.observation.unit.clone(),
        normalized_unit: normalized_unit.clone(),
        original_full_unit: item.observation.unit.clone(),
        normalized_full_unit: normalized_unit.clone(),
    });
    explain.conversion = Some(ConversionExplain {
        summary: format!("applied {} step(s)", steps.len()),
        total_factor: steps.iter().map(|s| s.factor).product(),
        steps,
    });

    Some(NormalizeOutcome {
        normalized_value: Some(value),
        normalized_unit: Some(normalized_unit),
        explain,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, ClassifierRules};
    use crate::types::{FxSourceKind, Observation};

    #[test]
    fn scenario_3_weekly_aud_wages_to_usd_month() {
        let observation = Observation::new(1631.0)
            .with_name("Average Weekly Wages")
            .with_unit("AUD per Week")
            .with_currency("AUD");
        let item = classify(&[observation], &ClassifierRules::default()).remove(0);
        assert_eq!(item.bucket, crate::types::BucketKind::Wages);

        let fx = FxTable::new("USD", FxSourceKind::Fallback, "SNP", 0).with_rate("AUD", 1.0 / 1.52);
        let outcome = normalize(&item, Some("USD"), Some(&fx), false).unwrap();
        let value = outcome.normalized_value.unwrap();
        assert!((value - 4650.0).abs() < 5.0, "got {value}");
        assert_eq!(outcome.normalized_unit.as_deref(), Some("USD per month"));
        assert_eq!(outcome.explain.domain.as_deref(), Some("wages"));
    }

    #[test]
    fn excludes_index_values_when_flagged() {
        let observation = Observation::new(100.0)
            .with_name("Wage Index")
            .with_unit("Index Points");
        let item = ParsedObservation {
            input_index: 0,
            observation,
            parsed_unit: crate::types::ParsedUnit {
                category: Category::Index,
                ..crate::types::ParsedUnit::unknown("Index Points")
            },
            bucket: crate::types::BucketKind::Wages,
        };
        assert!(normalize(&item, Some("USD"), None, true).is_none());
    }
}
