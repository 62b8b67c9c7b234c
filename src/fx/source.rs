//! FX source resolution (spec §4.10): live provider or caller-supplied
//! fallback, with source id/as-of provenance.

use async_trait::async_trait;

use crate::error::FxError;
use crate::fx::cache::FxCache;
use crate::types::{FxSourceKind, FxTable};

pub const DEFAULT_LIVE_SOURCE_ID: &str = "ECB";
pub const DEFAULT_FALLBACK_SOURCE_ID: &str = "SNP";

/// The injectable live-FX collaborator (spec §1 "the actual live-FX HTTP
/// client...specified only by its interface"). The crate ships no HTTP
/// implementation; callers provide one, mirroring how the teacher's
/// `transport::fetcher` traits are implemented per-broker outside the
/// core library.
#[async_trait]
pub trait FxProvider: Send + Sync {
    /// Resolves an [`FxTable`] for `base`, optionally as-of a given unix
    /// timestamp. Implementations perform the live network call.
    async fn resolve(&self, base: &str, as_of: Option<i64>) -> Result<FxTable, FxError>;
}

/// Resolution strategy for one pipeline run (spec §4.10 "Selection is
/// driven by a useLive flag").
pub struct FxResolutionRequest<'a> {
    pub base: String,
    pub as_of: Option<i64>,
    pub use_live: bool,
    pub provider: Option<&'a dyn FxProvider>,
    pub fallback: Option<FxTable>,
    /// The in-process `(base, as-of-bucket)` TTL cache (spec §5). When
    /// absent, every call with `use_live` hits the provider directly.
    pub cache: Option<&'a FxCache>,
}

/// Outcome of [`resolve`]: the table (if any could be acquired) plus any
/// warning to surface to the caller.
pub struct FxResolution {
    pub table: Option<FxTable>,
    pub warning: Option<String>,
}

/// Resolves an FX table for the run: try live first (if `use_live` and a
/// provider is configured), fall through to the fallback table on live
/// failure, and emit a warning rather than propagating the error (spec
/// §4.10, §7 item 3).
pub async fn resolve(request: FxResolutionRequest<'_>) -> FxResolution {
    if request.use_live {
        if let Some(provider) = request.provider {
            let outcome = match request.cache {
                Some(cache) => {
                    let key = cache.key(&request.base, request.as_of);
                    cache.get_or_fetch(&key, || provider.resolve(&request.base, request.as_of)).await
                }
                None => provider.resolve(&request.base, request.as_of).await,
            };
            match outcome {
                Ok(mut table) => {
                    if table.source_id.is_empty() {
                        table.source_id = DEFAULT_LIVE_SOURCE_ID.to_string();
                    }
                    if table.as_of == 0 {
                        table.as_of = request.as_of.unwrap_or_else(|| chrono::Utc::now().timestamp());
                    }
                    table.source = FxSourceKind::Live;
                    return FxResolution { table: Some(table), warning: None };
                }
                Err(err) => {
                    return fallback_or_warn(request.fallback, Some(format!("live FX provider failed: {err}; falling back")));
                }
            }
        }
    }
    fallback_or_warn(request.fallback, None)
}

fn fallback_or_warn(fallback: Option<FxTable>, prior_warning: Option<String>) -> FxResolution {
    match fallback {
        Some(mut table) => {
            if table.source_id.is_empty() {
                table.source_id = DEFAULT_FALLBACK_SOURCE_ID.to_string();
            }
            if table.as_of == 0 {
                table.as_of = chrono::Utc::now().timestamp();
            }
            table.source = FxSourceKind::Fallback;
            FxResolution { table: Some(table), warning: prior_warning }
        }
        None => {
            let warning = match prior_warning {
                Some(w) => format!("{w}; no fallback FX table configured"),
                None => "no FX table available (neither live nor fallback configured)".to_string(),
            };
            FxResolution { table: None, warning: Some(warning) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl FxProvider for FailingProvider {
        async fn resolve(&self, _base: &str, _as_of: Option<i64>) -> Result<FxTable, FxError> {
            Err(FxError::LiveProviderFailed("network unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn falls_back_on_live_failure_with_warning() {
        let fallback = FxTable::new("USD", FxSourceKind::Fallback, "", 0);
        let resolution = resolve(FxResolutionRequest {
            base: "USD".to_string(),
            as_of: None,
            use_live: true,
            provider: Some(&FailingProvider),
            fallback: Some(fallback),
            cache: None,
        })
        .await;
        assert!(resolution.table.is_some());
        assert!(resolution.warning.unwrap().contains("live FX provider failed"));
        assert_eq!(resolution.table.unwrap().source_id, DEFAULT_FALLBACK_SOURCE_ID);
    }

    #[tokio::test]
    async fn no_table_available_when_nothing_configured() {
        let resolution = resolve(FxResolutionRequest {
            base: "USD".to_string(),
            as_of: None,
            use_live: false,
            provider: None,
            fallback: None,
            cache: None,
        })
        .await;
        assert!(resolution.table.is_none());
        assert!(resolution.warning.is_some());
    }

    struct CountingProvider {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl FxProvider for CountingProvider {
        async fn resolve(&self, base: &str, as_of: Option<i64>) -> Result<FxTable, FxError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(FxTable::new(base, FxSourceKind::Live, "", as_of.unwrap_or(0)))
        }
    }

    #[tokio::test]
    async fn repeated_live_resolutions_share_one_provider_call_through_the_cache() {
        let provider = CountingProvider { calls: std::sync::atomic::AtomicUsize::new(0) };
        let cache = FxCache::new(std::time::Duration::from_secs(60));
        for _ in 0..3 {
            let resolution = resolve(FxResolutionRequest {
                base: "USD".to_string(),
                as_of: Some(1_000_000),
                use_live: true,
                provider: Some(&provider),
                fallback: None,
                cache: Some(&cache),
            })
            .await;
            assert!(resolution.table.is_some());
        }
        assert_eq!(provider.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
