//! Domain classifier (spec §4.2): routes parsed observations into buckets.

pub mod classifier;
pub mod rules;

pub use classifier::{classify, ClassifierRules, ExemptionRule, UnitOverrideRule};
