use crate::cache_entry::{AnyValue, CacheEntry};
use crate::{CacheConfig, CacheError};

use std::any::type_name;
use std::collections::HashMap;
use std::future::Future;
use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use error_location::ErrorLocation;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::debug;
use regex::Regex;
use serde::Serialize;
use tokio::time::Instant;

type SharedFetch = Shared<BoxFuture<'static, Result<AnyValue, AnyValue>>>;

struct PendingRequest {
    id: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    pending: HashMap<String, PendingRequest>,
    next_request_id: u64,
}

impl CacheState {
    /// Unexpired value for `key`; expired entries are evicted on the way.
    fn fresh(&mut self, key: &str, now: Instant) -> Option<AnyValue> {
        match self.entries.get(key) {
            Some(entry) if entry.is_valid(now) => Some(Arc::clone(&entry.value)),
            Some(_) => {
                self.entries.remove(key);
                debug!("[SessionCache] Evicted expired entry: {}", key);
                None
            }
            None => None,
        }
    }
}

/// Time-expiring memoization with in-flight request de-duplication.
///
/// Clones share the same storage, so one instance is created at startup and
/// handed to every consumer. Concurrent `get` calls for a key observe a single
/// fetch: the pending slot is registered under the lock before anything is
/// awaited.
#[derive(Clone)]
pub struct SessionCache {
    state: Arc<Mutex<CacheState>>,
    config: CacheConfig,
}

impl SessionCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the cached value for `key`, join an identical in-flight request,
    /// or run `fetcher` and cache its `Ok` result for `ttl`.
    ///
    /// Errors are never cached. Every waiter of a failed fetch receives the
    /// same error.
    pub async fn get<T, E, F, Fut>(&self, key: &str, ttl: Duration, fetcher: F) -> Result<T, Arc<E>>
    where
        T: Clone + Send + Sync + 'static,
        E: From<CacheError> + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let future = {
            let mut state = self.lock();

            if let Some(value) = state.fresh(key, Instant::now()) {
                debug!("[SessionCache] Cache hit for: {}", key);
                return downcast_value(key, &value).map_err(|e| Arc::new(E::from(e)));
            }

            if let Some(pending) = state.pending.get(key) {
                debug!("[SessionCache] Deduplicating request for: {}", key);
                pending.future.clone()
            } else {
                debug!("[SessionCache] Fetching: {}", key);
                state.next_request_id += 1;
                let id = state.next_request_id;
                let future =
                    fetch_and_store(Arc::downgrade(&self.state), key.to_string(), id, ttl, fetcher);
                state.pending.insert(
                    key.to_string(),
                    PendingRequest {
                        id,
                        future: future.clone(),
                    },
                );
                future
            }
        };

        match future.await {
            Ok(value) => downcast_value(key, &value).map_err(|e| Arc::new(E::from(e))),
            Err(error) => match error.downcast::<E>() {
                Ok(error) => Err(error),
                Err(_) => Err(Arc::new(E::from(type_mismatch::<E>(key)))),
            },
        }
    }

    /// Store a value directly
    pub fn set<T>(&self, key: &str, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        self.lock()
            .entries
            .insert(key.to_string(), CacheEntry::new(Arc::new(value), ttl));
        debug!("[SessionCache] Set cache for: {}", key);
    }

    /// Cached value without fetching. A value stored under a different type
    /// reads as a miss.
    pub fn get_cached<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let value = self.lock().fresh(key, Instant::now())?;
        value.as_ref().downcast_ref::<T>().cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().fresh(key, Instant::now()).is_some()
    }

    /// Drop the entry and any in-flight request for `key`
    pub fn invalidate(&self, key: &str) {
        let mut state = self.lock();
        state.entries.remove(key);
        state.pending.remove(key);
        debug!("[SessionCache] Invalidated cache for: {}", key);
    }

    /// Drop every entry and in-flight request whose key matches `pattern`
    pub fn clear_pattern(&self, pattern: &Regex) {
        let mut state = self.lock();
        state.entries.retain(|key, _| !pattern.is_match(key));
        state.pending.retain(|key, _| !pattern.is_match(key));
        debug!("[SessionCache] Cleared cache matching pattern: {}", pattern);
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.pending.clear();
        debug!("[SessionCache] Cleared all cache");
    }

    /// Number of stored entries, expired ones included until next read
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        lock_state(&self.state)
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Key for a cached HTTP call: `fetch:<url>:<options as JSON>`
pub fn cache_key<O: Serialize + ?Sized>(url: &str, options: &O) -> String {
    let options = serde_json::to_string(options).unwrap_or_default();
    format!("fetch:{url}:{options}")
}

// The maps stay consistent across a panicking holder, so a poisoned lock is recovered
fn lock_state(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn fetch_and_store<T, E, F, Fut>(
    state: Weak<Mutex<CacheState>>,
    key: String,
    id: u64,
    ttl: Duration,
    fetcher: F,
) -> SharedFetch
where
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    async move {
        let result = fetcher()
            .await
            .map(|value| Arc::new(value) as AnyValue);

        if let Some(shared) = state.upgrade() {
            let mut state = lock_state(&shared);
            // Only the request still registered for the key may clear it or store
            let is_current = state
                .pending
                .get(&key)
                .is_some_and(|pending| pending.id == id);

            if is_current {
                state.pending.remove(&key);
                if let Ok(value) = &result {
                    state
                        .entries
                        .insert(key.clone(), CacheEntry::new(Arc::clone(value), ttl));
                }
            } else {
                debug!("[SessionCache] Discarding superseded result for: {}", key);
            }
        }

        result.map_err(|error| Arc::new(error) as AnyValue)
    }
    .boxed()
    .shared()
}

fn downcast_value<T>(key: &str, value: &AnyValue) -> Result<T, CacheError>
where
    T: Clone + 'static,
{
    value
        .as_ref()
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| type_mismatch::<T>(key))
}

#[track_caller]
fn type_mismatch<T>(key: &str) -> CacheError {
    CacheError::TypeMismatch {
        key: key.to_string(),
        expected: type_name::<T>(),
        location: ErrorLocation::from(Location::caller()),
    }
}
