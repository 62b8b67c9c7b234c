use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-dimension share map: token (canonically cased) -> fraction of the
/// group exhibiting that token (spec §3 AutoTargetSelection, §4.3).
pub type DimensionShares = BTreeMap<String, f64>;

/// The currency/magnitude/time triple an indicator group was resolved to,
/// plus the evidence behind the resolution (spec §3, §4.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoTargetSelection {
    pub indicator_key: String,
    pub selected_currency: Option<String>,
    pub selected_magnitude: Option<String>,
    pub selected_time: Option<String>,
    pub currency_shares: DimensionShares,
    pub magnitude_shares: DimensionShares,
    pub time_shares: DimensionShares,
    /// Human-readable per-dimension outcome, e.g.
    /// `"currency=majority(USD=0.67); magnitude=tie-break(prefer-millions); time=majority(month=0.80)"`.
    pub reason: String,
}

impl AutoTargetSelection {
    pub fn is_empty(&self) -> bool {
        self.selected_currency.is_none()
            && self.selected_magnitude.is_none()
            && self.selected_time.is_none()
    }
}
