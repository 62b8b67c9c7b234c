//! Time-basis resolution and general time rescaling (spec §4.4, §4.5, §9
//! Open Question (i)).

use crate::parser;
use crate::types::{ParsedObservation, TimeScale};

/// Canonical seconds-per-unit constants (spec §4.5): `hour=3600,
/// day=86400, week=7*day, month=52/12*week, quarter=3*month, year=12*month`.
pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const SECONDS_PER_DAY: f64 = 24.0 * SECONDS_PER_HOUR;
pub const SECONDS_PER_WEEK: f64 = 7.0 * SECONDS_PER_DAY;
pub const SECONDS_PER_MONTH: f64 = (52.0 / 12.0) * SECONDS_PER_WEEK;
pub const SECONDS_PER_QUARTER: f64 = 3.0 * SECONDS_PER_MONTH;
pub const SECONDS_PER_YEAR: f64 = 12.0 * SECONDS_PER_MONTH;

/// The wages specialization's own hours-per-month constant. Intentionally
/// distinct from the general `730 != 52/12*7*24 (≈730.67)` chain above —
/// spec §9 Open Question (i) preserves both rather than unifying them.
pub const WAGES_HOURS_PER_MONTH: f64 = 730.0;
pub const WAGES_WEEKS_PER_MONTH: f64 = 52.0 / 12.0;
pub const WAGES_QUARTERS_PER_MONTH_FACTOR: f64 = 1.0 / 3.0;
pub const WAGES_YEARS_PER_MONTH_FACTOR: f64 = 1.0 / 12.0;

pub fn seconds_per_unit(scale: TimeScale) -> f64 {
    match scale {
        TimeScale::Hour => SECONDS_PER_HOUR,
        TimeScale::Day => SECONDS_PER_DAY,
        TimeScale::Week => SECONDS_PER_WEEK,
        TimeScale::Month => SECONDS_PER_MONTH,
        TimeScale::Quarter => SECONDS_PER_QUARTER,
        TimeScale::Year => SECONDS_PER_YEAR,
    }
}

/// Effective source time basis for one item: unit time token, else
/// `item.periodicity`, else `None` (spec §4.4, Glossary "Effective time
/// basis"). Per invariant (iv): when both are present, the unit token wins.
pub fn effective_source_time(item: &ParsedObservation) -> Option<TimeScale> {
    item.parsed_unit.time_scale.or_else(|| {
        item.observation
            .periodicity
            .as_deref()
            .and_then(parser::time_scale_from_explicit_periodicity)
    })
}

/// The spec-defined ratio `sourceSecondsPerUnit / targetSecondsPerUnit`
/// (spec §4.5). Direction is upsample when `< 1`, downsample when `> 1`.
pub fn factor(source: TimeScale, target: TimeScale) -> f64 {
    seconds_per_unit(source) / seconds_per_unit(target)
}

/// Rescales a flow value from `source` to `target` time basis:
/// `value_target = value_source * (target_seconds / source_seconds)`,
/// i.e. `value_source / factor(source, target)`.
pub fn convert(value: f64, source: TimeScale, target: TimeScale) -> f64 {
    if source == target {
        return value;
    }
    value / factor(source, target)
}
