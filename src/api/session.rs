//! Streaming session accumulator (spec §4.13
//! "a session object exposing addDataPoint/addDataPoints,
//! previewAutoTargets, clear, size, and process").

use std::collections::HashMap;

use crate::classify::{classify, ClassifierRules};
use crate::config::ProcessOptions;
use crate::orchestrator::{machine, AbortSignal, PipelineOutcome};
use crate::types::{AutoTargetSelection, Observation};

/// Accumulates observations until processed or cleared (spec §3
/// "Sessions...own an accumulating vector of observations until processed
/// or cleared").
pub struct EconifySession {
    items: Vec<Observation>,
    options: ProcessOptions,
}

impl EconifySession {
    pub fn new(options: ProcessOptions) -> Self {
        EconifySession { items: Vec::new(), options }
    }

    pub fn add_data_point(&mut self, item: Observation) {
        self.items.push(item);
    }

    pub fn add_data_points(&mut self, items: impl IntoIterator<Item = Observation>) {
        self.items.extend(items);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Runs the auto-target selector over the accumulated items without
    /// normalizing them (spec §4.13 "runs the selector without
    /// normalizing").
    pub fn preview_auto_targets(&self) -> HashMap<String, AutoTargetSelection> {
        let rules = ClassifierRules {
            exemptions: self.options.exemptions.clone(),
            unit_overrides: self.options.unit_overrides.clone(),
        };
        let parsed = classify(&self.items, &rules);
        machine::compute_target_selections(&parsed, &self.options)
    }

    /// Runs the full pipeline over the accumulated items, resolving
    /// `qualityReview` through `options.quality_review_policy`.
    pub async fn process(&mut self) -> PipelineOutcome {
        machine::run(&self.items, &self.options, false, AbortSignal::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_and_clears() {
        let mut session = EconifySession::new(ProcessOptions::default());
        assert_eq!(session.size(), 0);
        session.add_data_point(Observation::new(1.0).with_name("GDP").with_unit("USD Million"));
        session.add_data_points(vec![Observation::new(2.0).with_name("GDP").with_unit("USD Million")]);
        assert_eq!(session.size(), 2);
        session.clear();
        assert_eq!(session.size(), 0);
    }

    #[tokio::test]
    async fn processes_accumulated_items() {
        let mut session = EconifySession::new(ProcessOptions::default());
        session.add_data_point(Observation::new(1.0).with_name("GDP").with_unit("USD Million").with_currency("USD"));
        let outcome = session.process().await;
        assert_eq!(outcome.data.len(), 1);
    }

    #[test]
    fn preview_auto_targets_runs_selector_without_normalizing() {
        let mut options = ProcessOptions::default();
        options.auto_target_by_indicator = true;
        let mut session = EconifySession::new(options);
        session.add_data_points(vec![
            Observation::new(1.0).with_name("BoT").with_unit("USD Million").with_currency("USD"),
            Observation::new(2.0).with_name("BoT").with_unit("USD Million").with_currency("USD"),
        ]);
        let selections = session.preview_auto_targets();
        let selection = selections.get("bot").expect("indicator key present");
        assert_eq!(selection.selected_currency.as_deref(), Some("USD"));
    }
}
