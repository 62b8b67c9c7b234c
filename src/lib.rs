//! econify: normalizes heterogeneous economic time-series observations to
//! a common currency, magnitude, and time basis, with full provenance.
//!
//! See [`api`] for the public entry points (`process_economic_data`,
//! `process_economic_data_auto`, `process_economic_data_by_indicator`,
//! `validate_economic_data`, [`api::EconifySession`]) and [`config`] for
//! the [`config::ProcessOptions`] knobs that drive them.

pub mod adjust;
pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod explain;
pub mod fx;
pub mod normalize;
pub mod orchestrator;
pub mod parser;
pub mod quality;
pub mod target;
pub mod types;

pub use api::{
    process_economic_data, process_economic_data_auto, process_economic_data_by_indicator, validate_economic_data,
    EconifySession, ValidationReport,
};
pub use config::{ProcessOptions, ProcessOptionsBuilder};
pub use error::{EconifyError, EconifyResult};
pub use orchestrator::{AbortSignal, Metrics, PipelineOutcome};
pub use types::Observation;
