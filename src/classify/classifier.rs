//! Domain classifier (spec §4.2): assigns each observation to exactly one
//! [`BucketKind`].

use serde::{Deserialize, Serialize};

use crate::classify::rules;
use crate::parser;
use crate::types::{BucketKind, Category, Observation, ParsedObservation, ParsedUnit};

/// A unit-override entry: rewrites an item's unit (and optionally clears
/// its scale) before parsing, matched by exact id or case-insensitive name
/// substring (spec §4.2 "Unit overrides").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitOverrideRule {
    pub match_id: Option<String>,
    pub match_name: Option<String>,
    pub new_unit: String,
    #[serde(default)]
    pub clear_scale: bool,
}

impl UnitOverrideRule {
    fn matches(&self, observation: &Observation) -> bool {
        if let Some(id) = &self.match_id {
            let matches_id = match &observation.id {
                Some(crate::types::ObservationId::Text(t)) => t == id,
                Some(crate::types::ObservationId::Number(n)) => n.to_string() == *id,
                None => false,
            };
            if matches_id {
                return true;
            }
        }
        if let Some(name) = &self.match_name {
            if let Some(observation_name) = &observation.name {
                return observation_name.to_lowercase().contains(&name.to_lowercase());
            }
        }
        false
    }
}

/// An exemption entry: routes matching items to [`BucketKind::Exempt`]
/// unchanged (spec §4.2 "Exemptions").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExemptionRule {
    pub id: Option<String>,
    /// Case-insensitive substring match against `observation.name`.
    pub name_contains: Option<String>,
    /// Matches against the tentative bucket's `domain_tag()` (e.g. `"metals"`).
    pub category_group: Option<String>,
}

impl ExemptionRule {
    fn matches(&self, observation: &Observation, tentative: BucketKind) -> bool {
        if let Some(id) = &self.id {
            let matches_id = match &observation.id {
                Some(crate::types::ObservationId::Text(t)) => t == id,
                Some(crate::types::ObservationId::Number(n)) => n.to_string() == *id,
                None => false,
            };
            if matches_id {
                return true;
            }
        }
        if let Some(name) = &self.name_contains {
            if let Some(observation_name) = &observation.name {
                if observation_name.to_lowercase().contains(&name.to_lowercase()) {
                    return true;
                }
            }
        }
        if let Some(group) = &self.category_group {
            if group.eq_ignore_ascii_case(tentative.domain_tag()) {
                return true;
            }
        }
        false
    }
}

/// Classifier configuration: exemptions and unit overrides (spec §4.2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierRules {
    #[serde(default)]
    pub exemptions: Vec<ExemptionRule>,
    #[serde(default)]
    pub unit_overrides: Vec<UnitOverrideRule>,
}

/// Classifies every observation, returning one [`ParsedObservation`] per
/// input item in the same order.
///
/// Unit overrides are applied strictly before parsing (spec §4.2); the
/// tentative bucket is computed from the (possibly overridden) parse,
/// then exemptions can still redirect the item to [`BucketKind::Exempt`].
#[tracing::instrument(skip_all, fields(count = observations.len()))]
pub fn classify(observations: &[Observation], rules: &ClassifierRules) -> Vec<ParsedObservation> {
    observations
        .iter()
        .enumerate()
        .map(|(input_index, observation)| classify_one(input_index, observation, rules))
        .collect()
}

fn classify_one(input_index: usize, observation: &Observation, config: &ClassifierRules) -> ParsedObservation {
    let (unit, scale) = apply_unit_override(observation, config);
    let parsed_unit = parser::parse(&unit);

    let tentative = tentative_bucket(observation, &parsed_unit, scale.as_deref());
    let bucket = if config.exemptions.iter().any(|rule| rule.matches(observation, tentative)) {
        BucketKind::Exempt
    } else {
        tentative
    };

    ParsedObservation {
        input_index,
        observation: observation.clone(),
        parsed_unit,
        bucket,
    }
}

fn apply_unit_override(observation: &Observation, config: &ClassifierRules) -> (String, Option<String>) {
    for rule in &config.unit_overrides {
        if rule.matches(observation) {
            let scale = if rule.clear_scale { None } else { observation.scale.clone() };
            return (rule.new_unit.clone(), scale);
        }
    }
    (observation.unit.clone(), observation.scale.clone())
}

fn tentative_bucket(observation: &Observation, parsed: &ParsedUnit, _overridden_scale: Option<&str>) -> BucketKind {
    let name = observation.name.as_deref().unwrap_or("");

    if parsed.category == Category::Percentage {
        return BucketKind::Percentages;
    }

    if is_crypto(observation, parsed, name) {
        return BucketKind::Crypto;
    }

    if rules::contains_any(&parsed.original, rules::COMMODITY_UNIT_KEYWORDS) {
        return BucketKind::Commodities;
    }

    if is_physical_tonnage(parsed) {
        if rules::contains_any(&parsed.original, rules::AGRICULTURE_UNIT_KEYWORDS)
            || rules::contains_any(name, rules::AGRICULTURE_NAME_KEYWORDS)
        {
            return BucketKind::Agriculture;
        }
        if rules::contains_any(name, rules::METALS_NAME_KEYWORDS) {
            return BucketKind::Metals;
        }
    }

    if parsed.category == Category::Index {
        return BucketKind::Indices;
    }
    if parsed.category == Category::Energy {
        return BucketKind::Energy;
    }

    let explicit_currency = observation.currency.as_deref();
    let effective_currency = explicit_currency.or(parsed.currency.as_deref());
    let explicit_periodicity = observation.periodicity.as_deref();
    let has_time = parsed.time_scale.is_some()
        || explicit_periodicity
            .map(|p| parser::time_scale_from_explicit_periodicity(p).is_some())
            .unwrap_or(false);

    if let Some(bucket) = classify_monetary(effective_currency, has_time, name) {
        return bucket;
    }

    // A currency-numerator ratio whose denominator is not a time unit
    // (e.g. "USD/Liter") lands in the ratios bucket; ratio units whose
    // denominator *is* a time unit were already routed to monetary-flow
    // above via `has_time`.
    if parsed.is_composite && parsed.components.contains_key("denominator") {
        return BucketKind::Ratios;
    }

    if parsed.category == Category::Population
        || parsed.category == Category::Count
        || rules::contains_any(&parsed.original, rules::COUNT_KEYWORDS)
        || rules::contains_any(name, rules::COUNT_KEYWORDS)
    {
        return BucketKind::Counts;
    }

    BucketKind::Unknown
}

fn is_crypto(observation: &Observation, parsed: &ParsedUnit, name: &str) -> bool {
    let currency_hint = observation
        .currency
        .as_deref()
        .or(parsed.currency.as_deref())
        .map(|c| c.to_lowercase());
    if let Some(code) = &currency_hint {
        if rules::CRYPTO_KEYWORDS.contains(&code.as_str()) {
            return true;
        }
    }
    rules::contains_any(name, rules::CRYPTO_KEYWORDS) || rules::contains_any(&parsed.original, rules::CRYPTO_KEYWORDS)
}

fn is_physical_tonnage(parsed: &ParsedUnit) -> bool {
    parsed.category == Category::Physical
        && (parsed.original.to_lowercase().contains("ton") || parsed.original.to_lowercase().contains("oz"))
}

fn classify_monetary(currency: Option<&str>, has_time: bool, name: &str) -> Option<BucketKind> {
    let name_is_flow = rules::contains_any(name, rules::FLOW_NAME_KEYWORDS);
    let name_is_wage = rules::contains_any(name, rules::WAGE_NAME_KEYWORDS);
    let name_is_stock = rules::contains_any(name, rules::STOCK_NAME_KEYWORDS);

    if currency.is_none() {
        if name_is_flow || name_is_wage {
            // Indicator name alone denotes a flow even without a parsed
            // currency token (spec §4.2: "or the indicator name clearly
            // denotes a flow").
            return Some(if name_is_wage { BucketKind::Wages } else { BucketKind::MonetaryFlow });
        }
        return None;
    }

    if has_time || name_is_flow || name_is_wage {
        return Some(if name_is_wage { BucketKind::Wages } else { BucketKind::MonetaryFlow });
    }

    // Currency present, no time: a stock/level. Stock-name keywords are
    // the spec's explicit signal; absent any keyword we still default a
    // bare currency-with-no-time reading to monetary-stock, since that is
    // the only other monetary bucket available for it.
    let _ = name_is_stock;
    Some(BucketKind::MonetaryStock)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(name: &str, unit: &str) -> Observation {
        Observation::new(1.0).with_name(name).with_unit(unit)
    }

    #[test]
    fn exports_with_currency_and_time_is_monetary_flow() {
        let parsed = classify(&[obs("Exports", "USD Million per month")], &ClassifierRules::default());
        assert_eq!(parsed[0].bucket, BucketKind::MonetaryFlow);
    }

    #[test]
    fn wages_keyword_refines_flow_to_wages() {
        let parsed = classify(&[obs("Average Hourly Wages", "USD per Hour")], &ClassifierRules::default());
        assert_eq!(parsed[0].bucket, BucketKind::Wages);
    }

    #[test]
    fn currency_without_time_is_monetary_stock() {
        let parsed = classify(&[obs("Foreign Exchange Reserves", "USD Million")], &ClassifierRules::default());
        assert_eq!(parsed[0].bucket, BucketKind::MonetaryStock);
    }

    #[test]
    fn percentage_unit_is_percentages_bucket() {
        let parsed = classify(&[obs("Inflation Rate", "%")], &ClassifierRules::default());
        assert_eq!(parsed[0].bucket, BucketKind::Percentages);
    }

    #[test]
    fn ratio_unit_with_non_time_denominator_is_ratios() {
        let parsed = classify(&[obs("Fuel Price", "USD/Liter")], &ClassifierRules::default());
        assert_eq!(parsed[0].bucket, BucketKind::Ratios);
    }

    #[test]
    fn copper_tonnes_is_metals_not_agriculture() {
        let parsed = classify(&[obs("Copper Production", "Tonnes")], &ClassifierRules::default());
        assert_eq!(parsed[0].bucket, BucketKind::Metals);
    }

    #[test]
    fn wheat_tonnes_is_agriculture() {
        let parsed = classify(&[obs("Wheat Production", "Tonnes")], &ClassifierRules::default());
        assert_eq!(parsed[0].bucket, BucketKind::Agriculture);
    }

    #[test]
    fn btc_is_crypto() {
        let parsed = classify(&[obs("Bitcoin Price", "BTC")], &ClassifierRules::default());
        assert_eq!(parsed[0].bucket, BucketKind::Crypto);
    }

    #[test]
    fn car_registrations_is_counts() {
        let parsed = classify(&[obs("Car Registrations", "Units")], &ClassifierRules::default());
        assert_eq!(parsed[0].bucket, BucketKind::Counts);
    }

    #[test]
    fn exemption_by_name_wins_over_classification() {
        let rules = ClassifierRules {
            exemptions: vec![ExemptionRule {
                id: None,
                name_contains: Some("internal index".to_string()),
                category_group: None,
            }],
            unit_overrides: vec![],
        };
        let parsed = classify(&[obs("Internal Index Metric", "Index Points")], &rules);
        assert_eq!(parsed[0].bucket, BucketKind::Exempt);
    }

    #[test]
    fn unit_override_applies_before_parsing() {
        let rules = ClassifierRules {
            exemptions: vec![],
            unit_overrides: vec![UnitOverrideRule {
                match_id: None,
                match_name: Some("car registrations".to_string()),
                new_unit: "Units".to_string(),
                clear_scale: true,
            }],
        };
        let observation = obs("Car Registrations", "Thousand").with_scale("Thousands");
        let parsed = classify(&[observation], &rules);
        assert_eq!(parsed[0].parsed_unit.original, "Units");
        assert_eq!(parsed[0].bucket, BucketKind::Counts);
    }
}
