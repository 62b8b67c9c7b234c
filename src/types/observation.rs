use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::types::bucket::BucketKind;
use crate::types::explain::Explain;
use crate::types::unit::ParsedUnit;

/// A caller-supplied or echoed-back observation identifier, either a
/// string or an integer (spec §3 Observation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationId {
    Text(String),
    Number(i64),
}

/// A caller-supplied date, either free text or a unix timestamp
/// (spec §3 Observation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationDate {
    Text(String),
    Timestamp(i64),
}

/// The observation carrier that flows through the whole pipeline.
///
/// Fields before `normalized_value` are caller-supplied input; fields from
/// `normalized_value` onward are populated additively by the normalizer
/// (spec §3 Lifecycles: "mutated additively only inside the normalizer").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub id: Option<ObservationId>,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    pub periodicity: Option<String>,
    pub scale: Option<String>,
    pub currency: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<ObservationDate>,
    pub year: Option<i32>,
    pub metadata: Option<Map<String, serde_json::Value>>,

    // --- populated by the normalizer ---
    pub normalized_value: Option<f64>,
    pub normalized_unit: Option<String>,
    /// Inflation-adjusted value, populated only when `adjustInflation` is on.
    pub real_value: Option<f64>,
    pub explain: Option<Explain>,
}

impl Observation {
    /// Constructs a bare observation with only the required `value` field
    /// set; everything else defaults to absent.
    pub fn new(value: f64) -> Self {
        Observation {
            id: None,
            value,
            unit: String::new(),
            periodicity: None,
            scale: None,
            currency: None,
            name: None,
            description: None,
            date: None,
            year: None,
            metadata: None,
            normalized_value: None,
            normalized_unit: None,
            real_value: None,
            explain: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_periodicity(mut self, periodicity: impl Into<String>) -> Self {
        self.periodicity = Some(periodicity.into());
        self
    }

    pub fn with_scale(mut self, scale: impl Into<String>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(ObservationId::Text(id.into()));
        self
    }

    /// Normalized indicator key: the configured key field (default `name`),
    /// lowercased and trimmed (spec §3 AutoTargetSelection, Glossary
    /// "Indicator group").
    pub fn indicator_key(&self) -> String {
        self.name
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_lowercase()
    }
}

/// An [`Observation`] paired with its parse/classification results and its
/// position in the original input slice.
///
/// Carrying `input_index` explicitly is what lets bucket processing run in
/// parallel (spec §5, §9 "tag each item with its input index") while still
/// reassembling output in input order.
#[derive(Debug, Clone)]
pub struct ParsedObservation {
    pub input_index: usize,
    pub observation: Observation,
    pub parsed_unit: ParsedUnit,
    pub bucket: BucketKind,
}

