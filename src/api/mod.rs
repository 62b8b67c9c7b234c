//! Batch API & session (spec §4.13): the crate's public entry points.

pub mod batch;
pub mod by_indicator;
pub mod session;

pub use batch::{process_economic_data, process_economic_data_auto, validate_economic_data, ValidationReport};
pub use by_indicator::process_economic_data_by_indicator;
pub use session::EconifySession;
