//! Orchestrator state machine (spec §4.11): sequences
//! validate -> parse -> quality-assess -> fetch-FX -> normalize ->
//! optional adjustments -> finalize.

pub mod cancel;
pub mod machine;
pub mod state;
pub mod validate;

pub use cancel::AbortSignal;
pub use machine::{run, Metrics, PipelineOutcome};
pub use state::{OrchestratorState, QualityReviewEvent};
pub use validate::ValidationIssue;
