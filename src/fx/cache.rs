//! In-process FX cache (spec §5): keyed by `(base, as-of-bucket)`, short
//! TTL, concurrent fills of the same key collapse to one fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::types::FxTable;

struct CacheEntry {
    table: FxTable,
    inserted_at: Instant,
}

/// An in-process, single-flight TTL cache of [`FxTable`]s.
///
/// Per-key `tokio::sync::Mutex` guards collapse concurrent fills for the
/// same `(base, as-of-bucket)` key into one fetch; a `std::sync::Mutex`
/// protects the entry map itself, mirroring the short-critical-section
/// pattern the teacher's in-process caches use (lock, copy/clone, drop).
pub struct FxCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    fill_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl FxCache {
    pub fn new(ttl: Duration) -> Self {
        FxCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
            fill_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Cache key for `(base, as-of-bucket)` (spec §5); the as-of timestamp
    /// is bucketed to the nearest TTL window so near-simultaneous requests
    /// for "now" land on the same key.
    pub fn key(&self, base: &str, as_of: Option<i64>) -> String {
        let bucket = match as_of {
            Some(ts) if self.ttl.as_secs() > 0 => ts / self.ttl.as_secs() as i64,
            Some(ts) => ts,
            None => 0,
        };
        format!("{}:{}", base.to_uppercase(), bucket)
    }

    fn fresh_entry(&self, key: &str) -> Option<FxTable> {
        let entries = self.entries.lock().expect("fx cache mutex poisoned");
        entries.get(key).and_then(|entry| {
            if entry.inserted_at.elapsed() < self.ttl {
                Some(entry.table.clone())
            } else {
                None
            }
        })
    }

    fn lock_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.fill_locks.lock().expect("fx cache mutex poisoned");
        locks.entry(key.to_string()).or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))).clone()
    }

    /// Returns a cached table for `key` if fresh, else calls `fetch` and
    /// caches the result. Concurrent callers for the same key block on the
    /// same fill lock rather than issuing redundant fetches.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<FxTable, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<FxTable, E>>,
    {
        if let Some(table) = self.fresh_entry(key) {
            return Ok(table);
        }

        let fill_lock = self.lock_for(key);
        let _guard = fill_lock.lock().await;

        if let Some(table) = self.fresh_entry(key) {
            return Ok(table);
        }

        let table = fetch().await?;
        let mut entries = self.entries.lock().expect("fx cache mutex poisoned");
        entries.insert(
            key.to_string(),
            CacheEntry {
                table: table.clone(),
                inserted_at: Instant::now(),
            },
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FxSourceKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn caches_across_repeated_fetches() {
        let cache = FxCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let key = cache.key("USD", Some(1_000_000));

        for _ in 0..3 {
            let result: Result<FxTable, String> = cache
                .get_or_fetch(&key, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(FxTable::new("USD", FxSourceKind::Live, "ECB", 1_000_000))
                })
                .await;
            assert!(result.is_ok());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_refetch() {
        let cache = FxCache::new(Duration::from_millis(10));
        let key = cache.key("USD", None);
        let _: Result<FxTable, String> = cache
            .get_or_fetch(&key, || async { Ok(FxTable::new("USD", FxSourceKind::Live, "ECB", 0)) })
            .await;

        tokio::time::sleep(Duration::from_millis(20)).await;

        let calls = AtomicUsize::new(0);
        let _: Result<FxTable, String> = cache
            .get_or_fetch(&key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(FxTable::new("USD", FxSourceKind::Live, "ECB", 0))
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
