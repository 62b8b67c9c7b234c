//! Optional inflation/seasonal adjustment over normalized values (spec §4.14).

pub mod inflation;
pub mod seasonal;

pub use inflation::{InflationAdjuster, NoopInflationAdjuster};
pub use seasonal::{NoopSeasonalAdjuster, SeasonalAdjuster};
