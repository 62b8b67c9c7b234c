//! Auto-target selector (spec §4.3): per-indicator-group majority vote
//! over currency/magnitude/time, with configurable tie-breakers.

pub mod selector;

pub use selector::{select_targets, CurrencyTieBreak, TieBreakers};
