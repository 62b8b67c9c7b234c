//! Append-only explain assembly (spec §4.12, §9 "Explain metadata as an
//! append-only record") and warning de-duplication (spec §7 "onWarning
//! fires for every accumulated warning exactly once").

use std::collections::HashSet;

use crate::types::{AutoTargetSelection, Explain, TargetSelectionExplain};

/// Attaches target-selection provenance to an item's [`Explain`] record
/// when the auto-target selector drove its targets (spec §4.12: "When
/// auto-target selection drove the targets, explain.targetSelection is
/// attached with mode = 'auto-by-indicator'").
pub fn attach_target_selection(explain: &mut Explain, selection: &AutoTargetSelection) {
    explain.target_selection = Some(TargetSelectionExplain {
        mode: "auto-by-indicator".to_string(),
        selection: selection.clone(),
    });
}

/// Accumulates warnings across a pipeline run, invoking an `on_warning`
/// callback exactly once per distinct message (spec §7): the "processed
/// marker" is simply set membership, not a literal string prefix.
#[derive(Default)]
pub struct WarningSink {
    emitted: HashSet<String>,
    all: Vec<String>,
}

impl WarningSink {
    pub fn new() -> Self {
        WarningSink::default()
    }

    /// Records `message`, returning `true` the first time it is seen (the
    /// caller should fire `on_warning` only on that first occurrence).
    pub fn push(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        let first_time = self.emitted.insert(message.clone());
        self.all.push(message);
        first_time
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = String>) {
        for message in messages {
            self.push(message);
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.all
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
