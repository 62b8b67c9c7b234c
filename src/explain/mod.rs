//! Explain builder (spec §4.12): folds per-step deltas into an
//! append-only [`crate::types::Explain`] record and attaches
//! target-selection provenance when auto-targeting drove the run.

pub mod builder;

pub use builder::{attach_target_selection, WarningSink};
