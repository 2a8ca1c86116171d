//! Decoded-body caching.
//!
//! Several matchers are usually asserted against the same response. The
//! cache decodes a body once per [`ResponseId`] and hands out the shared
//! value afterwards. Entries are keyed by response identity, so asserting on
//! two different responses in sequence never leaks one body into the other.
//!
//! Bodies are read as UTF-8 JSON; a leading byte order mark is skipped.

use crate::error::DecodeError;
use assay_core::{HttpResponse, ResponseId};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Instant;

/// Configuration for the body cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether decoded bodies are memoized at all.
    pub enabled: bool,
    /// Maximum number of entries before the oldest is evicted.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1024,
        }
    }
}

impl CacheConfig {
    /// Disable caching; every matcher call decodes the body again.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_entries: 0,
        }
    }

    fn is_active(&self) -> bool {
        self.enabled && self.max_entries > 0
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cached decode of one response.
#[derive(Debug, Clone)]
struct CacheEntry {
    body: Arc<Value>,
    inserted_at: Instant,
    sequence: u64,
    owner: ThreadId,
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of decodes performed.
    pub misses: u64,
    /// Number of entries currently in cache.
    pub size: usize,
    /// Number of evictions due to capacity.
    pub evictions: u64,
}

/// Per-response cache of decoded JSON bodies.
///
/// Failed decodes are never cached, so a later call decodes again.
///
/// # Example
///
/// ```
/// use assay_core::TestResponse;
/// use assay_json::JsonBodyCache;
/// use http::StatusCode;
/// use serde_json::json;
///
/// let cache = JsonBodyCache::default();
/// let response = TestResponse::json(StatusCode::OK, &json!({"id": 1}));
///
/// let first = cache.get_or_decode(&response).unwrap();
/// let second = cache.get_or_decode(&response).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
///
/// cache.reset();
/// assert!(cache.is_empty());
/// ```
#[derive(Debug)]
pub struct JsonBodyCache {
    config: CacheConfig,
    entries: RwLock<HashMap<ResponseId, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    inserts: AtomicU64,
}

impl Default for JsonBodyCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl JsonBodyCache {
    /// Create a new cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
        }
    }

    /// Returns the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the decoded body of `response`, decoding it on first access.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body is not valid JSON. The failure is
    /// not cached.
    pub fn get_or_decode<R>(&self, response: &R) -> Result<Arc<Value>, DecodeError>
    where
        R: HttpResponse + ?Sized,
    {
        let id = response.id();

        if self.config.is_active() {
            if let Some(entry) = self.entries.read().get(&id) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(response_id = %id, "decoded body cache hit");
                return Ok(Arc::clone(&entry.body));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let bytes = response.body();
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let body: Value = serde_json::from_slice(bytes).map_err(|e| {
            tracing::debug!(response_id = %id, error = %e, "response body is not valid JSON");
            DecodeError::from(e)
        })?;
        let body = Arc::new(body);

        if self.config.is_active() {
            self.insert(id, Arc::clone(&body));
        }

        Ok(body)
    }

    /// Returns true if a decoded body is cached for `id`.
    pub fn contains(&self, id: ResponseId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Drops the cached body for one response.
    pub fn invalidate(&self, id: ResponseId) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    /// Clears all cached bodies.
    ///
    /// On a cache shared by parallel tests this also drops bodies other
    /// threads are still asserting on; they are decoded again on next use.
    /// Prefer [`JsonBodyCache::scope`] there.
    pub fn reset(&self) {
        let mut entries = self.entries.write();
        let cleared = entries.len();
        entries.clear();
        tracing::debug!(cleared, "decoded body cache reset");
    }

    /// Returns a guard that, when dropped, releases the bodies decoded on
    /// the current thread while it was held.
    ///
    /// Entries decoded by other threads are left alone, so tests running in
    /// parallel against one shared cache keep their bodies.
    #[must_use = "bodies are released when the guard is dropped"]
    pub fn scope(&self) -> CacheScope<'_> {
        CacheScope {
            cache: self,
            owner: thread::current().id(),
            since: self.inserts.load(Ordering::SeqCst),
        }
    }

    /// Number of cached bodies.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.len(),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn insert(&self, id: ResponseId, body: Arc<Value>) {
        let mut entries = self.entries.write();

        while entries.len() >= self.config.max_entries {
            let Some(oldest) = Self::find_oldest(&entries) else {
                break;
            };
            entries.remove(&oldest);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(response_id = %oldest, "evicted decoded body");
        }

        entries.insert(
            id,
            CacheEntry {
                body,
                inserted_at: Instant::now(),
                sequence: self.inserts.fetch_add(1, Ordering::SeqCst),
                owner: thread::current().id(),
            },
        );
    }

    fn release(&self, owner: ThreadId, since: u64) {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.owner != owner || entry.sequence < since);
        tracing::debug!(released = before - entries.len(), "decoded body cache scope released");
    }

    fn find_oldest(entries: &HashMap<ResponseId, CacheEntry>) -> Option<ResponseId> {
        entries
            .iter()
            .min_by_key(|(id, entry)| (entry.inserted_at, **id))
            .map(|(id, _)| *id)
    }
}

/// Releases the bodies its thread decoded while it was held.
///
/// ```
/// use assay_json::JsonBodyCache;
///
/// let cache = JsonBodyCache::default();
/// {
///     let _scope = cache.scope();
///     // assertions for one test case
/// }
/// assert!(cache.is_empty());
/// ```
#[derive(Debug)]
pub struct CacheScope<'a> {
    cache: &'a JsonBodyCache,
    owner: ThreadId,
    since: u64,
}

impl CacheScope<'_> {
    /// The cache this scope releases entries from.
    pub fn cache(&self) -> &JsonBodyCache {
        self.cache
    }
}

impl Drop for CacheScope<'_> {
    fn drop(&mut self) {
        self.cache.release(self.owner, self.since);
    }
}
