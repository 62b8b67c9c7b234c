use serde::{Deserialize, Serialize};

use crate::types::target::AutoTargetSelection;

/// Version tag stamped on every [`Explain`] record (spec §3).
pub const EXPLAIN_VERSION: &str = "v2";

/// Whether a conversion step scaled a value up or down, or left it
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionDirection {
    Upscale,
    Downscale,
    Upsample,
    Downsample,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyExplain {
    pub original: Option<String>,
    pub normalized: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxExplain {
    pub currency: String,
    pub base: String,
    pub rate: f64,
    pub source: String,
    pub source_id: String,
    pub as_of: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagnitudeExplain {
    pub original_scale: Option<String>,
    pub target_scale: Option<String>,
    pub factor: f64,
    pub direction: ConversionDirection,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicityExplain {
    pub original: Option<String>,
    pub target: Option<String>,
    pub adjusted: bool,
    pub factor: f64,
    pub direction: ConversionDirection,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitsExplain {
    pub original_unit: String,
    pub normalized_unit: String,
    pub original_full_unit: String,
    pub normalized_full_unit: String,
}

/// One entry in [`ConversionExplain::steps`]. Canonical ordering is
/// Scale -> Currency -> Time (spec §4.12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStep {
    pub kind: String,
    pub factor: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionExplain {
    pub summary: String,
    pub total_factor: f64,
    pub steps: Vec<ConversionStep>,
}

/// A single quality-related annotation attached to an item (e.g. a
/// scale outlier flag, spec §4.9.1 / §8 scenario 4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityWarning {
    #[serde(rename = "type")]
    pub warning_type: String,
    pub message: String,
    pub details: serde_json::Value,
}

/// Versioned, append-only record of every conversion applied to an item
/// (spec §3 Explain, §4.12, §9 design note).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Explain {
    pub explain_version: Option<&'static str>,
    pub domain: Option<String>,
    pub currency: Option<CurrencyExplain>,
    pub fx: Option<FxExplain>,
    pub magnitude: Option<MagnitudeExplain>,
    pub periodicity: Option<PeriodicityExplain>,
    pub units: Option<UnitsExplain>,
    pub conversion: Option<ConversionExplain>,
    pub target_selection: Option<TargetSelectionExplain>,
    pub quality_warnings: Vec<QualityWarning>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSelectionExplain {
    pub mode: String,
    pub selection: AutoTargetSelection,
}

impl Explain {
    pub fn new() -> Self {
        Explain {
            explain_version: Some(EXPLAIN_VERSION),
            ..Default::default()
        }
    }
}
