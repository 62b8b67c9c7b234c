//! One-shot batch entry points (spec §6
//! `processEconomicData`/`processEconomicDataAuto`/`validateEconomicData`).

use crate::classify::{classify, ClassifierRules};
use crate::config::ProcessOptions;
use crate::orchestrator::{machine, validate, AbortSignal, PipelineOutcome, ValidationIssue};
use crate::quality::{assess, QualityScore};
use crate::types::Observation;

/// Runs the full pipeline, resolving `qualityReview` through
/// `options.quality_review_policy` (default: abort). Equivalent to the
/// spec's `processEconomicData(items, options)`.
pub async fn process_economic_data(items: &[Observation], options: &ProcessOptions) -> PipelineOutcome {
    process_economic_data_with_abort(items, options, &AbortSignal::new()).await
}

/// Same as [`process_economic_data`] but cancellable: call
/// `abort.abort()` from another task to stop the run at its next state
/// boundary (spec §5 "the orchestrator honors an external abort signal").
pub async fn process_economic_data_with_abort(
    items: &[Observation],
    options: &ProcessOptions,
    abort: &AbortSignal,
) -> PipelineOutcome {
    machine::run(items, options, false, abort.clone()).await
}

/// Identical to [`process_economic_data`] except `qualityReview` always
/// resolves to CONTINUE (spec §6 `processEconomicDataAuto`).
pub async fn process_economic_data_auto(items: &[Observation], options: &ProcessOptions) -> PipelineOutcome {
    machine::run(items, options, true, AbortSignal::new()).await
}

/// Schema/value sanity check without full processing (spec §6
/// `validateEconomicData(items, options) -> {valid, score, issues[]}`).
pub struct ValidationReport {
    pub valid: bool,
    pub score: Option<QualityScore>,
    pub issues: Vec<ValidationIssue>,
}

pub fn validate_economic_data(items: &[Observation], options: &ProcessOptions) -> ValidationReport {
    match validate::validate(items, options) {
        Ok(issues) => {
            let rules = ClassifierRules {
                exemptions: options.exemptions.clone(),
                unit_overrides: options.unit_overrides.clone(),
            };
            let parsed = classify(items, &rules);
            let score = assess(items, &parsed);
            ValidationReport {
                valid: issues.is_empty(),
                score: Some(score),
                issues,
            }
        }
        // A fatal validation error (e.g. no data) has no single offending
        // item; index 0 is a placeholder rather than a real item index.
        Err(err) => ValidationReport {
            valid: false,
            score: None,
            issues: vec![ValidationIssue { index: 0, message: err.to_string() }],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn processes_a_simple_monetary_flow_batch() {
        let items = vec![Observation::new(11027.0)
            .with_name("Balance of Trade")
            .with_unit("AUD Million")
            .with_currency("AUD")];
        let options = ProcessOptions::default();
        let outcome = process_economic_data(&items, &options).await;
        assert_eq!(outcome.data.len(), 1);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn empty_batch_yields_a_single_error() {
        let options = ProcessOptions::default();
        let outcome = process_economic_data(&[], &options).await;
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.data.is_empty());
    }

    #[test]
    fn validate_reports_issues_without_normalizing() {
        let items = vec![Observation::new(f64::NAN).with_unit("USD Million")];
        let options = ProcessOptions::default();
        let report = validate_economic_data(&items, &options);
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 1);
        assert!(report.score.is_some());
    }
}
