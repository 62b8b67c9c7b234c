//! Quality assessor (spec §4.9): scores a dataset 0-100 on completeness,
//! outliers, and consistency.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::types::{Observation, ParsedObservation};

/// Per-signal subscores plus the aggregate overall score (spec §4.9).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityScore {
    pub overall: f64,
    pub completeness: f64,
    pub outliers: f64,
    pub consistency: f64,
}

fn completeness(observations: &[Observation]) -> f64 {
    if observations.is_empty() {
        return 0.0;
    }
    let complete = observations
        .iter()
        .filter(|o| !o.value.is_nan() && !o.unit.trim().is_empty() && o.name.as_deref().is_some_and(|n| !n.trim().is_empty()))
        .count();
    100.0 * complete as f64 / observations.len() as f64
}

/// Median absolute deviation outlier fraction, grouped by indicator key.
/// An item is an outlier when its robust z-score (`0.6745 * (x - median) /
/// mad`) exceeds 3 in magnitude (spec §4.9).
fn outlier_subscore(parsed: &[ParsedObservation]) -> f64 {
    if parsed.is_empty() {
        return 100.0;
    }
    let groups: HashMap<String, Vec<f64>> =
        parsed.iter().into_group_map_by(|item| item.observation.indicator_key()).into_iter()
            .map(|(key, items)| (key, items.into_iter().map(|item| item.observation.value).collect()))
            .collect();

    let mut outlier_count = 0usize;
    for item in parsed {
        let values = &groups[&item.observation.indicator_key()];
        if values.len() < 3 {
            continue;
        }
        let median = median_of(values);
        let deviations: Vec<f64> = values.iter().map(|v| (v - median).abs()).collect();
        let mad = median_of(&deviations);
        if mad == 0.0 {
            continue;
        }
        let z = 0.6745 * (item.observation.value - median).abs() / mad;
        if z > 3.0 {
            outlier_count += 1;
        }
    }

    100.0 * (1.0 - outlier_count as f64 / parsed.len() as f64)
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Fraction of items whose parsed unit category agrees with the majority
/// category within their indicator group (spec §4.9).
fn consistency_subscore(parsed: &[ParsedObservation]) -> f64 {
    if parsed.is_empty() {
        return 100.0;
    }
    let by_key: HashMap<String, Vec<&ParsedObservation>> =
        parsed.iter().into_group_map_by(|item| item.observation.indicator_key());
    let groups: HashMap<String, HashMap<crate::types::Category, usize>> = by_key
        .into_iter()
        .map(|(key, items)| (key, items.into_iter().counts_by(|item| item.parsed_unit.category)))
        .collect();

    let mut agreeing = 0usize;
    for item in parsed {
        let counts = &groups[&item.observation.indicator_key()];
        let mode = counts.iter().max_by_key(|(_, count)| **count).map(|(cat, _)| *cat);
        if mode == Some(item.parsed_unit.category) {
            agreeing += 1;
        }
    }

    100.0 * agreeing as f64 / parsed.len() as f64
}

/// Computes the full [`QualityScore`] for a batch (spec §4.9).
#[tracing::instrument(skip_all, fields(count = parsed.len()))]
pub fn assess(observations: &[Observation], parsed: &[ParsedObservation]) -> QualityScore {
    let completeness = completeness(observations);
    let outliers = outlier_subscore(parsed);
    let consistency = consistency_subscore(parsed);
    let overall = (completeness + outliers + consistency) / 3.0;
    QualityScore {
        overall,
        completeness,
        outliers,
        consistency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, ClassifierRules};

    #[test]
    fn complete_well_formed_batch_scores_high() {
        let observations = vec![
            Observation::new(1.0).with_name("GDP").with_unit("USD Million"),
            Observation::new(2.0).with_name("GDP").with_unit("USD Million"),
        ];
        let parsed = classify(&observations, &ClassifierRules::default());
        let score = assess(&observations, &parsed);
        assert!(score.completeness > 99.0);
        assert!(score.overall > 90.0);
    }

    #[test]
    fn missing_name_lowers_completeness() {
        let observations = vec![Observation::new(1.0).with_unit("USD Million")];
        let parsed = classify(&observations, &ClassifierRules::default());
        let score = assess(&observations, &parsed);
        assert_eq!(score.completeness, 0.0);
    }
}
