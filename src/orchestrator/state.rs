//! Orchestrator states (spec §4.11): a closed, tagged-variant set plus
//! canonical progress percentages (spec §6 "Event surface").
//!
//! A plain tagged enum rather than the teacher's `PhantomData`-typestate
//! (`dfa::states::Trade<'a, State>`): the trade DFA's states are provable
//! at compile time from the call sequence, but this machine's transitions
//! are driven by runtime data (a quality score, an external CONTINUE/ABORT/
//! FIX event) that a typestate can't express without losing the ability to
//! hold "the current state" as a value to match on.

/// The closed set of orchestrator states (spec §4.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Validating,
    Parsing,
    QualityCheck,
    QualityReview,
    FetchingRates,
    Normalizing,
    CheckingInflation,
    AdjustingInflation,
    CheckingSeasonality,
    RemovingSeasonality,
    Finalizing,
    Success,
    Error,
}

impl OrchestratorState {
    /// The canonical step name used in progress events (spec §6).
    pub fn step_name(self) -> &'static str {
        match self {
            OrchestratorState::Idle => "idle",
            OrchestratorState::Validating => "validating",
            OrchestratorState::Parsing => "parsing",
            OrchestratorState::QualityCheck => "qualityCheck",
            OrchestratorState::QualityReview => "qualityReview",
            OrchestratorState::FetchingRates => "fetchingRates",
            OrchestratorState::Normalizing => "normalizing",
            OrchestratorState::CheckingInflation
            | OrchestratorState::AdjustingInflation
            | OrchestratorState::CheckingSeasonality
            | OrchestratorState::RemovingSeasonality => "adjusting",
            OrchestratorState::Finalizing => "finalizing",
            OrchestratorState::Success => "success",
            OrchestratorState::Error => "error",
        }
    }

    /// The canonical progress percentage for this state (spec §6); error
    /// states report `-1`.
    pub fn progress_percent(self) -> i32 {
        match self {
            OrchestratorState::Idle => 0,
            OrchestratorState::Validating => 10,
            OrchestratorState::Parsing => 20,
            OrchestratorState::QualityCheck => 30,
            OrchestratorState::QualityReview => 40,
            OrchestratorState::FetchingRates => 50,
            OrchestratorState::Normalizing => 60,
            OrchestratorState::CheckingInflation
            | OrchestratorState::AdjustingInflation
            | OrchestratorState::CheckingSeasonality
            | OrchestratorState::RemovingSeasonality => 70,
            OrchestratorState::Finalizing => 90,
            OrchestratorState::Success => 100,
            OrchestratorState::Error => -1,
        }
    }
}

/// External events accepted while in [`OrchestratorState::QualityReview`]
/// (spec §4.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityReviewEvent {
    Continue,
    Abort,
    Fix,
}
