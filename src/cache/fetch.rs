//! Single-flight memoization of asynchronous fetches.
//!
//! A [`FetchCache`] maps a key to one [`Computation`]: the shared handle of a
//! request that is either still pending or has settled into a value or an
//! error. Every reader of a key gets a clone of the same handle until the key
//! is invalidated, so the underlying request runs at most once per entry.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use metrics::counter;
use tracing::{debug, trace};

use crate::infra::telemetry::{
    FETCH_CACHE_HIT_TOTAL, FETCH_CACHE_INVALIDATE_TOTAL, FETCH_CACHE_MISS_TOTAL,
};

use super::lock::mutex_lock;

const SOURCE: &str = "cache::fetch";

type SharedFetch<T, E> = Shared<BoxFuture<'static, Result<Arc<T>, E>>>;

/// Observable state of a [`Computation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T, E> {
    Pending,
    Resolved(Arc<T>),
    Failed(E),
}

impl<T, E> FetchState<T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }
}

/// Shared handle to one in-flight or settled fetch.
///
/// Cloning is cheap and every clone observes the same settlement. Awaiting a
/// computation never restarts the request.
pub struct Computation<T, E> {
    inner: SharedFetch<T, E>,
}

impl<T, E> Clone for Computation<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Computation<T, E>
where
    T: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Wrap `future` so it runs once no matter how many clones await it.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            inner: future.map(|result| result.map(Arc::new)).boxed().shared(),
        }
    }

    /// Settled computation holding `value`.
    pub fn resolved(value: T) -> Self {
        Self::settled(Ok(value))
    }

    /// Settled computation holding `error`.
    pub fn failed(error: E) -> Self {
        Self::settled(Err(error))
    }

    fn settled(result: Result<T, E>) -> Self {
        let computation = Self::new(futures::future::ready(result));
        // A ready future completes on its first poll; `peek` sees it from here on.
        let _ = computation.inner.clone().now_or_never();
        computation
    }

    pub fn state(&self) -> FetchState<T, E> {
        match self.inner.peek() {
            None => FetchState::Pending,
            Some(Ok(value)) => FetchState::Resolved(Arc::clone(value)),
            Some(Err(error)) => FetchState::Failed(error.clone()),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.peek().is_none()
    }

    /// Whether both handles belong to the same underlying request.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Shared::ptr_eq(&self.inner, &other.inner)
    }

    /// Drive the request on the ambient tokio runtime, if any, so that it
    /// settles even when no reader is awaiting it.
    fn drive(&self) {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let driver = self.inner.clone();
            handle.spawn(async move {
                let _ = driver.await;
            });
        }
    }
}

impl<T, E> Future for Computation<T, E>
where
    E: Clone,
{
    type Output = Result<Arc<T>, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

impl<T, E> fmt::Debug for Computation<T, E>
where
    E: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.inner.peek() {
            None => "pending",
            Some(Ok(_)) => "resolved",
            Some(Err(_)) => "failed",
        };
        f.debug_struct("Computation").field("state", &state).finish()
    }
}

/// Key → [`Computation`] map with single-flight semantics.
///
/// Entries are created lazily on the first read after absence and removed only
/// by [`invalidate`](Self::invalidate) or [`invalidate_all`](Self::invalidate_all).
/// Settled entries stay until invalidated, including failures; there is no
/// automatic retry and no size bound.
pub struct FetchCache<K, T, E> {
    name: &'static str,
    entries: Mutex<HashMap<K, Computation<T, E>>>,
}

impl<K, T, E> FetchCache<K, T, E>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// `name` labels the cache in logs and metrics.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Return the computation for `key`, starting it with `factory` on a miss.
    ///
    /// `factory` is called at most once per entry and only builds the future;
    /// it runs while the map is locked, so it must not touch this cache.
    pub fn get<F, Fut>(&self, key: K, factory: F) -> Computation<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let mut entries = mutex_lock(&self.entries, SOURCE, "get");

        if let Some(existing) = entries.get(&key) {
            counter!(FETCH_CACHE_HIT_TOTAL, "cache" => self.name).increment(1);
            trace!(
                target = "folio::cache::fetch",
                cache = self.name,
                key = ?key,
                pending = existing.is_pending(),
                "fetch cache hit"
            );
            return existing.clone();
        }

        counter!(FETCH_CACHE_MISS_TOTAL, "cache" => self.name).increment(1);
        debug!(
            target = "folio::cache::fetch",
            cache = self.name,
            key = ?key,
            "fetch cache miss; starting request"
        );

        let computation = Computation::new(factory());
        entries.insert(key, computation.clone());
        drop(entries);

        computation.drive();
        computation
    }

    /// Current computation for `key` without starting one.
    pub fn peek(&self, key: &K) -> Option<Computation<T, E>> {
        mutex_lock(&self.entries, SOURCE, "peek").get(key).cloned()
    }

    /// Drop the entry for `key`. Returns whether an entry was present.
    ///
    /// A pending request keeps running for whoever already holds its
    /// computation; it is simply no longer reachable through the cache.
    pub fn invalidate(&self, key: &K) -> bool {
        let removed = mutex_lock(&self.entries, SOURCE, "invalidate")
            .remove(key)
            .is_some();

        if removed {
            counter!(FETCH_CACHE_INVALIDATE_TOTAL, "cache" => self.name).increment(1);
            debug!(
                target = "folio::cache::fetch",
                cache = self.name,
                key = ?key,
                "fetch cache entry invalidated"
            );
        }
        removed
    }

    /// Drop every entry. Returns how many were removed.
    pub fn invalidate_all(&self) -> usize {
        let removed = {
            let mut entries = mutex_lock(&self.entries, SOURCE, "invalidate_all");
            let count = entries.len();
            entries.clear();
            count
        };

        if removed > 0 {
            counter!(FETCH_CACHE_INVALIDATE_TOTAL, "cache" => self.name).increment(removed as u64);
            debug!(
                target = "folio::cache::fetch",
                cache = self.name,
                removed,
                "fetch cache cleared"
            );
        }
        removed
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::oneshot;

    use super::*;

    type TestCache = FetchCache<&'static str, String, String>;

    #[tokio::test]
    async fn concurrent_reads_share_one_request() {
        let cache = TestCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel::<String>();

        let first = cache.get("user", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { rx.await.map_err(|err| err.to_string()) }
        });
        let second = cache.get("user", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("unexpected".to_string()) }
        });

        assert!(first.ptr_eq(&second));
        assert!(first.is_pending());

        tx.send("Ada".to_string()).expect("receiver alive");
        let (a, b) = tokio::join!(first, second);
        let a = a.expect("resolved");
        let b = b.expect("resolved");

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_then_read_invokes_factory_again() {
        let cache = TestCache::new("test");
        let calls = AtomicUsize::new(0);
        let factory = || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(format!("value-{n}")) }
        };

        let first = cache.get("k", factory).await.expect("first value");
        assert!(cache.invalidate(&"k"));
        let second = cache.get("k", factory).await.expect("second value");

        assert_eq!(*first, "value-0");
        assert_eq!(*second, "value-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidating_absent_key_is_noop() {
        let cache = TestCache::new("test");
        assert!(!cache.invalidate(&"missing"));
        assert_eq!(cache.invalidate_all(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn failure_is_cached_until_invalidated() {
        let cache = TestCache::new("test");
        let calls = AtomicUsize::new(0);
        let failing = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<String, _>("boom".to_string()) }
        };

        let first = cache.get("k", failing);
        assert_eq!(first.clone().await.expect_err("failed"), "boom");

        let again = cache.get("k", failing);
        assert!(again.ptr_eq(&first));
        assert_eq!(again.state(), FetchState::Failed("boom".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pending_request_survives_invalidation() {
        let cache = TestCache::new("test");
        let (tx, rx) = oneshot::channel::<String>();

        let stale = cache.get("k", || async move { rx.await.map_err(|err| err.to_string()) });
        cache.invalidate(&"k");
        let fresh = cache.get("k", || async { Ok("fresh".to_string()) });
        assert!(!stale.ptr_eq(&fresh));

        tx.send("stale".to_string()).expect("receiver alive");
        assert_eq!(*stale.await.expect("stale settles"), "stale");

        let current = cache.peek(&"k").expect("fresh entry kept");
        assert!(current.ptr_eq(&fresh));
        assert_eq!(*current.await.expect("fresh value"), "fresh");
    }

    #[tokio::test]
    async fn request_settles_without_awaiting_reader() {
        let cache = TestCache::new("test");
        let computation = cache.get("k", || async { Ok("eager".to_string()) });

        for _ in 0..100 {
            if !computation.is_pending() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(
            computation.state(),
            FetchState::Resolved(Arc::new("eager".to_string()))
        );
    }

    #[test]
    fn invalidate_all_clears_every_key() {
        let cache = TestCache::new("test");
        cache.get("a", || async { Ok("a".to_string()) });
        cache.get("b", || async { Ok("b".to_string()) });
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.invalidate_all(), 2);
        assert!(cache.peek(&"a").is_none());
    }
}
