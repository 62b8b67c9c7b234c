//! The orchestrator state machine itself (spec §4.11): drives
//! `validating -> parsing -> qualityCheck -> qualityDecision ->
//! {fetchingRates | qualityReview} -> normalizing -> adjusting ->
//! finalizing -> success`, or `error` from any stage.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::adjust::{NoopInflationAdjuster, NoopSeasonalAdjuster};
use crate::classify::{classify, ClassifierRules};
use crate::config::ProcessOptions;
use crate::error::{EconifyError, OrchestratorError};
use crate::explain::{attach_target_selection, WarningSink};
use crate::fx::{resolve as resolve_fx, FxResolutionRequest};
use crate::normalize::dispatch::{normalize_item, NormalizeContext};
use crate::normalize::monetary::MonetaryTargets;
use crate::orchestrator::cancel::AbortSignal;
use crate::orchestrator::state::{OrchestratorState, QualityReviewEvent};
use crate::orchestrator::validate;
use crate::quality::{assess, detect_scale_outliers, QualityScore};
use crate::target::{select_targets, TieBreakers};
use crate::types::{AutoTargetSelection, Observation, ParsedObservation};

/// `metrics` in the spec §6 return shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub processing_time_ms: u128,
    pub records_processed: usize,
    pub records_failed: usize,
    pub quality_score: Option<f64>,
}

/// The full spec §6 return shape, shared by every public entry point in
/// `api::batch` / `api::by_indicator`.
pub struct PipelineOutcome {
    pub data: Vec<Observation>,
    /// `data[i]`'s position within the `items` slice this run was given,
    /// i.e. `data_indices[i]` such that `items[data_indices[i]]` is the
    /// input `data[i]` was produced from. Parallel to `data`; tracks survivors
    /// correctly even when scale-outlier filtering removes items from the
    /// middle of the batch, since `data.len()` can then be less than
    /// `items.len()` and position no longer equals original index. Callers
    /// that re-distribute `data` back into a larger original ordering (e.g.
    /// `api::by_indicator`'s per-group merge) must index by this, not by
    /// position.
    pub data_indices: Vec<usize>,
    pub warnings: Vec<String>,
    pub errors: Vec<EconifyError>,
    pub metrics: Metrics,
    pub outliers: Option<Vec<Observation>>,
    pub target_selections_by_indicator: Option<HashMap<String, AutoTargetSelection>>,
}

/// Runs the full pipeline for one batch, honoring `options.pipeline_timeout`
/// (spec §5 "public entry points impose a wall-clock timeout").
///
/// `auto_continue` selects between `processEconomicData`'s quality-review
/// policy (spec §6 `quality_review_policy`, defaulting to abort) and
/// `processEconomicDataAuto`'s "always CONTINUE" behavior.
pub async fn run(items: &[Observation], options: &ProcessOptions, auto_continue: bool, abort: AbortSignal) -> PipelineOutcome {
    let started = Instant::now();
    match tokio::time::timeout(options.pipeline_timeout, run_inner(items, options, auto_continue, abort)).await {
        Ok(outcome) => outcome,
        Err(_) => error_outcome(
            EconifyError::Orchestrator(OrchestratorError::Timeout(options.pipeline_timeout)),
            options,
            started,
            items.len(),
        ),
    }
}

#[tracing::instrument(skip_all, fields(count = items.len()))]
async fn run_inner(items: &[Observation], options: &ProcessOptions, auto_continue: bool, abort: AbortSignal) -> PipelineOutcome {
    let started = Instant::now();
    let mut warnings = WarningSink::new();

    emit_progress(options, OrchestratorState::Idle);

    // --- validating ---
    emit_progress(options, OrchestratorState::Validating);
    let issues = match validate::validate(items, options) {
        Ok(issues) => issues,
        Err(err) => return error_outcome(EconifyError::Validation(err), options, started, items.len()),
    };
    for issue in issues {
        push_warning(options, &mut warnings, issue.message);
    }
    if abort.is_aborted() {
        return error_outcome(EconifyError::Orchestrator(OrchestratorError::Aborted), options, started, items.len());
    }

    // --- parsing ---
    emit_progress(options, OrchestratorState::Parsing);
    let normalized_inputs = maybe_infer_units(items, options);
    let rules = ClassifierRules {
        exemptions: options.exemptions.clone(),
        unit_overrides: options.unit_overrides.clone(),
    };
    let mut parsed = classify(&normalized_inputs, &rules);
    if abort.is_aborted() {
        return error_outcome(EconifyError::Orchestrator(OrchestratorError::Aborted), options, started, items.len());
    }

    // --- qualityCheck / qualityDecision ---
    emit_progress(options, OrchestratorState::QualityCheck);
    let score = assess(&normalized_inputs, &parsed);
    if score.overall < options.min_quality_score {
        emit_progress(options, OrchestratorState::QualityReview);
        match decide_quality_review(&score, options, auto_continue) {
            QualityReviewEvent::Continue => {}
            QualityReviewEvent::Abort => {
                return error_outcome(
                    EconifyError::Orchestrator(OrchestratorError::QualityReviewAborted),
                    options,
                    started,
                    items.len(),
                );
            }
            QualityReviewEvent::Fix => {
                // No new raw data is available to a synchronous batch
                // call; "FIX" re-runs the (idempotent) parse step rather
                // than looping forever (see DESIGN.md).
                parsed = classify(&normalized_inputs, &rules);
            }
        }
    }
    if abort.is_aborted() {
        return error_outcome(EconifyError::Orchestrator(OrchestratorError::Aborted), options, started, items.len());
    }

    // --- fetchingRates ---
    emit_progress(options, OrchestratorState::FetchingRates);
    let resolution = resolve_fx(FxResolutionRequest {
        base: options.target_currency.clone().unwrap_or_else(|| "USD".to_string()),
        as_of: None,
        use_live: options.use_live_fx,
        provider: options.fx_provider.as_deref(),
        fallback: options.fx_fallback.clone(),
        cache: Some(options.fx_cache.as_ref()),
    })
    .await;
    if let Some(message) = resolution.warning {
        push_warning(options, &mut warnings, message);
    }
    let fx_table = resolution.table;

    // --- normalizing ---
    emit_progress(options, OrchestratorState::Normalizing);
    let selections = compute_target_selections(&parsed, options);
    let outcomes: Vec<_> = parsed
        .par_iter()
        .map(|item| {
            let (targets, selection) = resolve_item_targets(item, options, &selections);
            let ctx = NormalizeContext {
                targets,
                exclude_index_values: options.exclude_index_values,
            };
            let mut outcome = normalize_item(item, &ctx, fx_table.as_ref());
            if let Some(selection) = selection {
                attach_target_selection(&mut outcome.explain, &selection);
            }
            outcome
        })
        .collect();

    let mut data: Vec<Observation> = normalized_inputs;
    let mut records_failed = 0usize;
    for (item, outcome) in parsed.iter().zip(outcomes.into_iter()) {
        let observation = &mut data[item.input_index];
        observation.normalized_value = outcome.normalized_value;
        observation.normalized_unit = outcome.normalized_unit;
        observation.explain = if options.explain { Some(outcome.explain) } else { None };
        if observation.normalized_value.is_none() {
            records_failed += 1;
        }
        for warning in outcome.warnings {
            push_warning(options, &mut warnings, warning);
        }
    }
    if abort.is_aborted() {
        return error_outcome(EconifyError::Orchestrator(OrchestratorError::Aborted), options, started, items.len());
    }

    // `data_indices[i]` tracks which position in `items` `data[i]` came
    // from; starts as the identity mapping and gets filtered in lockstep
    // with `data` below so survivors stay correctly labeled regardless of
    // where in the batch an outlier gets dropped.
    let mut data_indices: Vec<usize> = (0..data.len()).collect();

    // --- scale-outlier detection (spec §4.9.1, before finalizing) ---
    let mut outliers = None;
    if options.detect_scale_outliers {
        let flags = detect_scale_outliers(&parsed, &options.scale_outlier_options);
        for flag in &flags {
            if let Some(explain) = data[flag.input_index].explain.as_mut() {
                let mut warning = flag.to_quality_warning();
                if !options.scale_outlier_options.include_details {
                    warning.details = serde_json::Value::Null;
                }
                explain.quality_warnings.push(warning);
            }
        }
        if options.scale_outlier_options.filter_outliers {
            let flagged: std::collections::HashSet<usize> = flags.iter().map(|f| f.input_index).collect();
            let mut kept = Vec::with_capacity(data.len());
            let mut kept_indices = Vec::with_capacity(data_indices.len());
            let mut removed = Vec::new();
            for (index, observation) in data.into_iter().enumerate() {
                if flagged.contains(&index) {
                    removed.push(observation);
                } else {
                    kept.push(observation);
                    kept_indices.push(data_indices[index]);
                }
            }
            data = kept;
            data_indices = kept_indices;
            outliers = Some(removed);
        }
    }

    // --- adjusting: checkingInflation -> [adjustingInflation] -> checkingSeasonality -> [removingSeasonality] ---
    emit_progress(options, OrchestratorState::CheckingInflation);
    if options.adjust_inflation {
        let adjuster = options
            .inflation_adjuster
            .clone()
            .unwrap_or_else(|| Arc::new(NoopInflationAdjuster));
        for observation in data.iter_mut() {
            if let Some(value) = observation.normalized_value {
                let country = observation
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get("country"))
                    .and_then(|v| v.as_str());
                match adjuster.adjust(value, country, observation.year) {
                    Ok(real) => observation.real_value = Some(real),
                    Err(err) => push_warning(options, &mut warnings, format!("inflation adjustment failed: {err}")),
                }
            }
        }
    }

    emit_progress(options, OrchestratorState::CheckingSeasonality);
    if options.remove_seasonality {
        let adjuster = options
            .seasonal_adjuster
            .clone()
            .unwrap_or_else(|| Arc::new(NoopSeasonalAdjuster));
        let series: Vec<f64> = data.iter().map(|o| o.normalized_value.unwrap_or(o.value)).collect();
        match adjuster.remove_seasonality(&series) {
            Ok(adjusted) => {
                for (observation, value) in data.iter_mut().zip(adjusted.into_iter()) {
                    if observation.normalized_value.is_some() {
                        observation.normalized_value = Some(value);
                    }
                }
            }
            Err(err) => push_warning(options, &mut warnings, format!("seasonal adjustment failed: {err}")),
        }
    }

    // --- finalizing ---
    emit_progress(options, OrchestratorState::Finalizing);
    emit_progress(options, OrchestratorState::Success);

    PipelineOutcome {
        data,
        data_indices,
        warnings: warnings.into_vec(),
        errors: Vec::new(),
        metrics: Metrics {
            processing_time_ms: started.elapsed().as_millis(),
            records_processed: items.len(),
            records_failed,
            quality_score: Some(score.overall),
        },
        outliers,
        target_selections_by_indicator: if selections.is_empty() { None } else { Some(selections) },
    }
}

fn decide_quality_review(score: &QualityScore, options: &ProcessOptions, auto_continue: bool) -> QualityReviewEvent {
    if auto_continue {
        return QualityReviewEvent::Continue;
    }
    match &options.quality_review_policy {
        Some(policy) => policy(score),
        None => QualityReviewEvent::Abort,
    }
}

fn maybe_infer_units(items: &[Observation], options: &ProcessOptions) -> Vec<Observation> {
    if !options.infer_units {
        return items.to_vec();
    }
    items
        .iter()
        .cloned()
        .map(|mut observation| {
            if observation.unit.trim().is_empty() {
                if let Some((unit, confidence)) =
                    crate::parser::infer_unit_from_context(observation.description.as_deref(), observation.name.as_deref())
                {
                    if confidence > 0.7 {
                        observation.unit = unit;
                    }
                }
            }
            observation
        })
        .collect()
}

pub(crate) fn compute_target_selections(parsed: &[ParsedObservation], options: &ProcessOptions) -> HashMap<String, AutoTargetSelection> {
    if !options.auto_target_by_indicator {
        return HashMap::new();
    }
    let mut groups: HashMap<String, Vec<&ParsedObservation>> = HashMap::new();
    for item in parsed {
        groups.entry(item.observation.indicator_key()).or_default().push(item);
    }
    let tie_breakers = TieBreakers {
        currency: options.currency_tie_break,
    };
    groups
        .into_iter()
        .filter(|(key, _)| is_indicator_allowed(key, options))
        .map(|(key, group)| {
            let selection = select_targets(
                &key,
                &group,
                options.auto_target_dimensions,
                options.min_majority_share,
                tie_breakers,
                options.target_currency.as_deref(),
            );
            (key, selection)
        })
        .filter(|(_, selection)| !selection.is_empty())
        .collect()
}

fn is_indicator_allowed(key: &str, options: &ProcessOptions) -> bool {
    if let Some(allow) = &options.allow_list {
        return allow.iter().any(|k| k == key);
    }
    if let Some(deny) = &options.deny_list {
        return !deny.iter().any(|k| k == key);
    }
    true
}

fn resolve_item_targets(
    item: &ParsedObservation,
    options: &ProcessOptions,
    selections: &HashMap<String, AutoTargetSelection>,
) -> (MonetaryTargets, Option<AutoTargetSelection>) {
    let key = item.observation.indicator_key();
    match selections.get(&key) {
        Some(selection) => {
            let currency = selection.selected_currency.clone().or_else(|| options.target_currency.clone());
            let magnitude = selection
                .selected_magnitude
                .as_deref()
                .and_then(|s| s.parse().ok())
                .or(options.target_magnitude);
            let time = selection
                .selected_time
                .as_deref()
                .and_then(|s| s.parse().ok())
                .or(options.target_time_scale);
            (MonetaryTargets { currency, magnitude, time }, Some(selection.clone()))
        }
        None => (
            MonetaryTargets {
                currency: options.target_currency.clone(),
                magnitude: options.target_magnitude,
                time: options.target_time_scale,
            },
            None,
        ),
    }
}

fn emit_progress(options: &ProcessOptions, state: OrchestratorState) {
    if let Some(callback) = &options.on_progress {
        callback(state.step_name(), state.progress_percent());
    }
}

fn push_warning(options: &ProcessOptions, sink: &mut WarningSink, message: impl Into<String>) {
    let message = message.into();
    if sink.push(message.clone()) {
        if let Some(callback) = &options.on_warning {
            callback(&message);
        }
    }
}

fn error_outcome(err: EconifyError, options: &ProcessOptions, started: Instant, total: usize) -> PipelineOutcome {
    if let Some(callback) = &options.on_error {
        callback(&err);
    }
    PipelineOutcome {
        data: Vec::new(),
        data_indices: Vec::new(),
        warnings: Vec::new(),
        errors: vec![err],
        metrics: Metrics {
            processing_time_ms: started.elapsed().as_millis(),
            records_processed: 0,
            records_failed: total,
            quality_score: None,
        },
        outliers: None,
        target_selections_by_indicator: None,
    }
}
