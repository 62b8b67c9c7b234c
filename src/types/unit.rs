use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The coarse category a unit string parses into.
///
/// Produced by [`crate::parser::unit_parser::parse`]; feeds the domain
/// classifier alongside indicator-name heuristics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum Category {
    Currency,
    Percentage,
    Index,
    Physical,
    Energy,
    Temperature,
    Population,
    Count,
    Rate,
    Time,
    Composite,
    #[default]
    Unknown,
}

/// Decimal order-of-magnitude label from the closed enumerated set.
///
/// Ordered so that `scale_index` gives a stable thousand-step position:
/// each step is a factor of 10^3 except `Hundreds`, which sits between
/// `RawUnits` and `Thousands` at a factor of 10^2 (spec §3/§4.5 treat
/// magnitude scaling via `10^(3*(src-dst))`; `Hundreds` is handled as a
/// half-step, see [`Magnitude::factor_to`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum Magnitude {
    RawUnits,
    Hundreds,
    Thousands,
    Millions,
    Billions,
    Trillions,
}

impl Magnitude {
    /// Base-10 exponent of this magnitude relative to raw units.
    pub fn exponent(self) -> i32 {
        match self {
            Magnitude::RawUnits => 0,
            Magnitude::Hundreds => 2,
            Magnitude::Thousands => 3,
            Magnitude::Millions => 6,
            Magnitude::Billions => 9,
            Magnitude::Trillions => 12,
        }
    }

    /// The multiplicative factor to convert a value expressed in `self`
    /// into a value expressed in `target`.
    ///
    /// `value_target = value_self * self.factor_to(target)`.
    pub fn factor_to(self, target: Magnitude) -> f64 {
        10f64.powi(self.exponent() - target.exponent())
    }

    /// The plural-friendly lowercase name used when rebuilding normalized
    /// unit strings (`"<CUR> <magnitude>[s] per <time>"`, spec §4.5).
    pub fn unit_noun(self) -> &'static str {
        match self {
            Magnitude::RawUnits => "",
            Magnitude::Hundreds => "hundred",
            Magnitude::Thousands => "thousand",
            Magnitude::Millions => "million",
            Magnitude::Billions => "billion",
            Magnitude::Trillions => "trillion",
        }
    }
}

/// Time basis qualifying a monetary flow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum TimeScale {
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeScale {
    pub fn noun(self) -> &'static str {
        match self {
            TimeScale::Hour => "hour",
            TimeScale::Day => "day",
            TimeScale::Week => "week",
            TimeScale::Month => "month",
            TimeScale::Quarter => "quarter",
            TimeScale::Year => "year",
        }
    }
}

/// The deterministic, never-failing output of the unit parser (spec §3, §4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedUnit {
    /// The original, unmodified unit text that was parsed.
    pub original: String,
    pub category: Category,
    pub currency: Option<String>,
    pub magnitude: Option<Magnitude>,
    pub time_scale: Option<TimeScale>,
    /// True for e.g. "USD/Liter", "USD per month" — a currency combined
    /// with a non-trivial denominator or an explicit time qualifier.
    pub is_composite: bool,
    /// Machine-readable submap of whatever sub-tokens were recognized
    /// (e.g. `{"denominator": "Liter"}` for a ratio unit).
    pub components: BTreeMap<String, String>,
}

impl ParsedUnit {
    /// An empty/unknown parse result for a given original string — the
    /// parser's fallback when nothing matches (spec §4.1 failure semantics).
    pub fn unknown(original: &str) -> Self {
        ParsedUnit {
            original: original.to_string(),
            category: Category::Unknown,
            currency: None,
            magnitude: None,
            time_scale: None,
            is_composite: false,
            components: BTreeMap::new(),
        }
    }
}
