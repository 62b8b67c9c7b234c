//! Per-indicator group splitter (spec §4.13, §6 `processEconomicDataByIndicator`).

use std::collections::HashMap;
use std::time::Instant;

use crate::config::ProcessOptions;
use crate::orchestrator::{machine, AbortSignal, Metrics, PipelineOutcome};
use crate::types::{AutoTargetSelection, Observation};

/// Splits `items` by normalized indicator key, runs the full pipeline on
/// each group independently, and merges the results back into the
/// original input order. `target_selections_by_indicator` on the merged
/// outcome is populated from every group's own selection (spec §4.13: "a
/// per-group targetSelections map so share distributions are available at
/// the group level") and each item's own `explain.target_selection` is
/// cleared, since it is now redundant with the group-level map.
pub async fn process_economic_data_by_indicator(items: &[Observation], options: &ProcessOptions) -> PipelineOutcome {
    let started = Instant::now();

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, item) in items.iter().enumerate() {
        let key = item.indicator_key();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(index);
    }

    let mut data: Vec<Option<Observation>> = (0..items.len()).map(|_| None).collect();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let mut records_failed = 0usize;
    let mut quality_scores = Vec::new();
    let mut target_selections_by_indicator: HashMap<String, AutoTargetSelection> = HashMap::new();
    let mut outliers: Vec<Observation> = Vec::new();

    for key in order {
        let indices = &groups[&key];
        let group_items: Vec<Observation> = indices.iter().map(|&i| items[i].clone()).collect();
        let outcome = machine::run(&group_items, options, false, AbortSignal::new()).await;

        // `outcome.data_indices[position]` is the observation's index
        // within `group_items`/`indices`, not `position` itself: scale-outlier
        // filtering inside `machine::run` can drop survivors from the
        // middle of the group, so position and group-relative index
        // diverge as soon as anything earlier than the last item is
        // removed. Indexing through `data_indices` keeps every surviving
        // observation mapped back to its real original slot.
        for (observation, &group_relative_index) in outcome.data.into_iter().zip(outcome.data_indices.iter()) {
            if let Some(&original_index) = indices.get(group_relative_index) {
                data[original_index] = Some(observation);
            }
        }
        warnings.extend(outcome.warnings);
        errors.extend(outcome.errors);
        records_failed += outcome.metrics.records_failed;
        if let Some(score) = outcome.metrics.quality_score {
            quality_scores.push(score);
        }
        if let Some(selections) = outcome.target_selections_by_indicator {
            target_selections_by_indicator.extend(selections);
        }
        if let Some(group_outliers) = outcome.outliers {
            outliers.extend(group_outliers);
        }
    }

    let mut merged = Vec::with_capacity(items.len());
    let mut merged_indices = Vec::with_capacity(items.len());
    for (original_index, observation) in data.into_iter().enumerate() {
        if let Some(observation) = observation {
            merged_indices.push(original_index);
            merged.push(observation);
        }
    }
    for observation in merged.iter_mut() {
        if let Some(explain) = observation.explain.as_mut() {
            explain.target_selection = None;
        }
    }

    PipelineOutcome {
        data: merged,
        data_indices: merged_indices,
        warnings,
        errors,
        metrics: Metrics {
            processing_time_ms: started.elapsed().as_millis(),
            records_processed: items.len(),
            records_failed,
            quality_score: if quality_scores.is_empty() {
                None
            } else {
                Some(quality_scores.iter().sum::<f64>() / quality_scores.len() as f64)
            },
        },
        outliers: if outliers.is_empty() { None } else { Some(outliers) },
        target_selections_by_indicator: if target_selections_by_indicator.is_empty() {
            None
        } else {
            Some(target_selections_by_indicator)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn merges_groups_back_into_original_order() {
        let items = vec![
            Observation::new(1.0).with_name("GDP").with_unit("USD Million").with_currency("USD"),
            Observation::new(2.0).with_name("Exports").with_unit("USD Million").with_currency("USD"),
            Observation::new(3.0).with_name("GDP").with_unit("USD Million").with_currency("USD"),
        ];
        let mut options = ProcessOptions::default();
        options.auto_target_by_indicator = true;
        let outcome = process_economic_data_by_indicator(&items, &options).await;
        assert_eq!(outcome.data.len(), 3);
        assert_eq!(outcome.data[0].name.as_deref(), Some("GDP"));
        assert_eq!(outcome.data[1].name.as_deref(), Some("Exports"));
        assert_eq!(outcome.data[2].name.as_deref(), Some("GDP"));
        let selections = outcome.target_selections_by_indicator.expect("selections present");
        assert!(selections.contains_key("gdp"));
        assert!(selections.contains_key("exports"));
        assert!(outcome.data[0].explain.as_ref().unwrap().target_selection.is_none());
    }

    #[tokio::test]
    async fn scale_outlier_removed_from_group_middle_does_not_mislabel_survivors() {
        use crate::quality::ScaleOutlierOptions;

        // All five share one indicator group; the outlier sits at original
        // index 2, not the edge, so a position-based merge (instead of one
        // keyed by `data_indices`) would shift every later survivor's data
        // onto the wrong original slot and silently drop the last one.
        let items = vec![
            Observation::new(6774.0).with_id("A").with_name("Tourist Arrivals").with_unit("Thousands"),
            Observation::new(1467.0).with_id("B").with_name("Tourist Arrivals").with_unit("Thousands"),
            Observation::new(520_394.0).with_id("C").with_name("Tourist Arrivals").with_unit("Thousands"),
            Observation::new(875.0).with_id("D").with_name("Tourist Arrivals").with_unit("Thousands"),
            Observation::new(3200.0).with_id("E").with_name("Tourist Arrivals").with_unit("Thousands"),
        ];
        let mut options = ProcessOptions::default();
        options.detect_scale_outliers = true;
        options.scale_outlier_options = ScaleOutlierOptions {
            filter_outliers: true,
            ..ScaleOutlierOptions::default()
        };

        let outcome = process_economic_data_by_indicator(&items, &options).await;

        assert_eq!(outcome.data.len(), 4);
        let outliers = outcome.outliers.expect("outlier present");
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].id, Some(crate::types::ObservationId::Text("C".to_string())));

        let by_id = |id: &str| {
            outcome
                .data
                .iter()
                .find(|o| o.id == Some(crate::types::ObservationId::Text(id.to_string())))
                .unwrap_or_else(|| panic!("survivor {id} missing from merged output"))
        };
        assert_eq!(by_id("A").normalized_value, Some(6_774_000.0));
        assert_eq!(by_id("B").normalized_value, Some(1_467_000.0));
        assert_eq!(by_id("D").normalized_value, Some(875_000.0));
        assert_eq!(by_id("E").normalized_value, Some(3_200_000.0));
    }
}
