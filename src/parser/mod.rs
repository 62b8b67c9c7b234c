//! Unit lexicon & parser (spec §4.1): turns a free-form unit string into a
//! [`crate::types::ParsedUnit`]. Deterministic, total, never fails.

pub mod currency_codes;
pub mod infer;
pub mod patterns;
pub mod unit_parser;

pub use infer::infer_unit_from_context;
pub use unit_parser::{magnitude_from_explicit_scale, parse, time_scale_from_explicit_periodicity};
