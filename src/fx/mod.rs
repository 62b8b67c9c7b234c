//! FX rate table acquisition (spec §4.10): live provider or fallback, with
//! in-process caching.

pub mod cache;
pub mod source;

pub use cache::FxCache;
pub use source::{resolve, FxProvider, FxResolution, FxResolutionRequest, DEFAULT_FALLBACK_SOURCE_ID, DEFAULT_LIVE_SOURCE_ID};
