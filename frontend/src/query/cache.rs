//! Keyed server-state cache.
//!
//! One process-wide map from `QueryKey` to the last result for that key. The
//! cache guarantees:
//!
//! - at most one tracked request per key: callers arriving while a request is
//!   in flight join it instead of sending their own;
//! - render-then-revalidate: cached data stays readable while a refetch runs,
//!   and survives a failed refetch;
//! - revalidation on mount, window focus, reconnect and explicit
//!   invalidation, for entries that are stale (`stale_time` is zero by
//!   default, so every settled entry is stale);
//! - last request wins: each fetch carries a generation number and a response
//!   whose generation is no longer current is dropped, so a superseded
//!   response can never overwrite newer data.
//!
//! Everything runs on the single UI thread; interior mutability is `RefCell`
//! and borrows are never held across a call into user code.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use tracing::{debug, trace, warn};

use super::key::QueryKey;
use super::state::{EntryState, QueryState, QueryStatus, Trigger};
use crate::error::{ApiError, ApiResult};

pub type AnyData = Arc<dyn Any + Send + Sync>;
pub type FetchResult = Result<AnyData, ApiError>;
/// A fetch that any number of callers can await.
pub type SharedFetch = Shared<LocalBoxFuture<'static, FetchResult>>;
/// Produces a new request for a key each time it is called.
pub type Fetcher = Rc<dyn Fn() -> LocalBoxFuture<'static, FetchResult>>;
/// Drives a detached future to completion on the UI event loop.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;
/// Called after an entry changes; the consumer re-reads its snapshot.
pub type Listener = Rc<dyn Fn()>;

/// Wraps a typed request function into a type-erased `Fetcher`.
pub fn fetcher<T, F, Fut>(fetch: F) -> Fetcher
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    Rc::new(move || {
        let request = fetch();
        async move { request.await.map(|value| Arc::new(value) as AnyData) }.boxed_local()
    })
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a settled entry counts as fresh.
    pub stale_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
        }
    }
}

#[derive(Default)]
struct Entry {
    data: Option<AnyData>,
    error: Option<ApiError>,
    status: QueryStatus,
    invalidated: bool,
    updated_at: Option<DateTime<Utc>>,
    generation: u64,
    in_flight: Option<SharedFetch>,
    /// Fetcher of the most recent consumer, reused by background refetches.
    fetcher: Option<Fetcher>,
    observers: BTreeMap<u64, Listener>,
}

struct Inner {
    entries: RefCell<HashMap<QueryKey, Entry>>,
    next_observer: Cell<u64>,
    spawner: Spawner,
    config: CacheConfig,
}

#[derive(Clone)]
pub struct QueryCache {
    inner: Rc<Inner>,
}

/// Non-owning handle, for listeners and event callbacks that must not keep
/// the cache alive.
#[derive(Clone)]
pub struct WeakQueryCache(Weak<Inner>);

impl WeakQueryCache {
    pub fn upgrade(&self) -> Option<QueryCache> {
        self.0.upgrade().map(|inner| QueryCache { inner })
    }
}

/// A mounted consumer of one key. Dropping it unsubscribes the consumer; the
/// cached entry itself stays for the next mount.
pub struct Observer {
    cache: Weak<Inner>,
    key: QueryKey,
    id: u64,
}

impl Drop for Observer {
    fn drop(&mut self) {
        let Some(inner) = self.cache.upgrade() else {
            return;
        };
        if let Some(entry) = inner.entries.borrow_mut().get_mut(&self.key) {
            entry.observers.remove(&self.id);
        }
        trace!(key = %self.key, observer = self.id, "observer removed");
    }
}

impl QueryCache {
    pub fn new(config: CacheConfig, spawner: Spawner) -> Self {
        Self {
            inner: Rc::new(Inner {
                entries: RefCell::new(HashMap::new()),
                next_observer: Cell::new(0),
                spawner,
                config,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakQueryCache {
        WeakQueryCache(Rc::downgrade(&self.inner))
    }

    /// Registers a consumer of `key`.
    ///
    /// Starts a fetch when the entry is absent or stale and nothing is in
    /// flight; cached data remains readable meanwhile. `on_change` runs after
    /// every change to the entry until the returned `Observer` is dropped.
    pub fn observe(&self, key: QueryKey, fetcher: Fetcher, on_change: Listener) -> Observer {
        let id = self.inner.next_observer.get();
        self.inner.next_observer.set(id + 1);

        let revalidate = {
            let mut entries = self.inner.entries.borrow_mut();
            let entry = entries.entry(key.clone()).or_default();
            entry.fetcher = Some(fetcher.clone());
            entry.observers.insert(id, on_change);
            entry.in_flight.is_none() && self.is_stale(entry, Utc::now())
        };

        if revalidate {
            debug!(%key, trigger = ?Trigger::Mount, "revalidating query");
            self.start_fetch(&key, fetcher);
        }

        Observer {
            cache: Rc::downgrade(&self.inner),
            key,
            id,
        }
    }

    /// Fetches `key`, joining the in-flight request if there is one.
    pub fn fetch(&self, key: &QueryKey, fetcher: Fetcher) -> SharedFetch {
        {
            let mut entries = self.inner.entries.borrow_mut();
            let entry = entries.entry(key.clone()).or_default();
            if let Some(in_flight) = &entry.in_flight {
                trace!(%key, "joining in-flight request");
                return in_flight.clone();
            }
            entry.fetcher = Some(fetcher.clone());
        }
        self.start_fetch(key, fetcher)
    }

    /// Marks every entry under `prefix` stale and refetches the ones that
    /// have a mounted consumer. A request already in flight for such an entry
    /// is superseded. Returns the number of matching entries.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let (matched, refetch) = {
            let mut entries = self.inner.entries.borrow_mut();
            let mut matched = 0;
            let mut refetch = Vec::new();
            for (key, entry) in entries.iter_mut() {
                if !key.starts_with(prefix) {
                    continue;
                }
                matched += 1;
                entry.invalidated = true;
                if entry.observers.is_empty() {
                    continue;
                }
                if let Some(fetcher) = &entry.fetcher {
                    refetch.push((key.clone(), fetcher.clone()));
                }
            }
            (matched, refetch)
        };

        debug!(%prefix, matched, refetching = refetch.len(), "invalidated queries");
        for (key, fetcher) in refetch {
            self.start_fetch(&key, fetcher);
        }
        matched
    }

    /// Forgets every entry under `prefix`. Data, error and timestamps are
    /// dropped and a request in flight is superseded, so nothing fetched
    /// before the reset can land afterwards. Unobserved entries are removed;
    /// observed ones start over from a first load and their consumers see a
    /// skeleton, never the old data. Returns the number of matching entries.
    pub fn reset(&self, prefix: &QueryKey) -> usize {
        let (matched, refetch) = {
            let mut entries = self.inner.entries.borrow_mut();
            let before = entries.len();
            entries.retain(|key, entry| !key.starts_with(prefix) || !entry.observers.is_empty());
            let mut matched = before - entries.len();
            let mut refetch = Vec::new();
            for (key, entry) in entries.iter_mut() {
                if !key.starts_with(prefix) {
                    continue;
                }
                matched += 1;
                entry.data = None;
                entry.error = None;
                entry.updated_at = None;
                entry.invalidated = false;
                entry.in_flight = None;
                entry.status = QueryStatus::Idle;
                entry.generation += 1;
                if let Some(fetcher) = &entry.fetcher {
                    refetch.push((key.clone(), fetcher.clone()));
                }
            }
            (matched, refetch)
        };

        debug!(%prefix, matched, refetching = refetch.len(), "reset queries");
        for (key, fetcher) in refetch {
            self.start_fetch(&key, fetcher);
        }
        matched
    }

    /// Refetches every observed, stale entry that has nothing in flight.
    /// Used for window focus and network reconnect.
    pub fn revalidate(&self, trigger: Trigger) -> usize {
        let now = Utc::now();
        let due: Vec<(QueryKey, Fetcher)> = {
            let entries = self.inner.entries.borrow();
            entries
                .iter()
                .filter(|(_, entry)| {
                    !entry.observers.is_empty()
                        && entry.in_flight.is_none()
                        && self.is_stale(entry, now)
                })
                .filter_map(|(key, entry)| {
                    entry
                        .fetcher
                        .as_ref()
                        .map(|fetcher| (key.clone(), fetcher.clone()))
                })
                .collect()
        };

        debug!(?trigger, count = due.len(), "revalidating observed queries");
        let count = due.len();
        for (key, fetcher) in due {
            self.start_fetch(&key, fetcher);
        }
        count
    }

    /// The current view of `key` for a consumer expecting `T`.
    pub fn snapshot<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryState<T> {
        let entries = self.inner.entries.borrow();
        let Some(entry) = entries.get(key) else {
            return QueryState::default();
        };
        QueryState {
            data: entry
                .data
                .clone()
                .and_then(|data| data.downcast::<T>().ok()),
            error: entry.error.clone(),
            status: entry.status,
            is_fetching: entry.in_flight.is_some(),
            updated_at: entry.updated_at,
        }
    }

    pub fn entry_state(&self, key: &QueryKey) -> EntryState {
        let entries = self.inner.entries.borrow();
        match entries.get(key) {
            None => EntryState::Absent,
            Some(entry) if entry.data.is_none() && entry.in_flight.is_some() => EntryState::Loading,
            Some(entry) if entry.data.is_none() && entry.error.is_none() => EntryState::Absent,
            Some(entry) if self.is_stale(entry, Utc::now()) => EntryState::Stale,
            Some(_) => EntryState::Fresh,
        }
    }

    pub fn observer_count(&self, key: &QueryKey) -> usize {
        self.inner
            .entries
            .borrow()
            .get(key)
            .map_or(0, |entry| entry.observers.len())
    }

    fn is_stale(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        if entry.invalidated {
            return true;
        }
        match entry.updated_at {
            None => true,
            Some(updated_at) => (now - updated_at)
                .to_std()
                .map_or(true, |age| age >= self.inner.config.stale_time),
        }
    }

    /// Starts a new generation of requests for `key`.
    fn start_fetch(&self, key: &QueryKey, fetcher: Fetcher) -> SharedFetch {
        let generation = {
            let mut entries = self.inner.entries.borrow_mut();
            let entry = entries.entry(key.clone()).or_default();
            entry.generation += 1;
            entry.generation
        };

        let request = fetcher();
        let weak = self.downgrade();
        let settle_key = key.clone();
        let shared = async move {
            let result = request.await;
            if let Some(cache) = weak.upgrade() {
                cache.settle(&settle_key, generation, &result);
            }
            result
        }
        .boxed_local()
        .shared();

        if let Some(entry) = self.inner.entries.borrow_mut().get_mut(key) {
            entry.in_flight = Some(shared.clone());
            entry.status = QueryStatus::Loading;
        }
        trace!(%key, generation, "fetch started");

        (self.inner.spawner)(shared.clone().map(|_| ()).boxed_local());
        self.notify(key);
        shared
    }

    fn settle(&self, key: &QueryKey, generation: u64, result: &FetchResult) {
        {
            let mut entries = self.inner.entries.borrow_mut();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };
            if entry.generation != generation {
                debug!(%key, generation, current = entry.generation, "discarding superseded response");
                return;
            }

            entry.in_flight = None;
            match result {
                Ok(data) => {
                    entry.data = Some(data.clone());
                    entry.error = None;
                    entry.status = QueryStatus::Success;
                    entry.updated_at = Some(Utc::now());
                    entry.invalidated = false;
                }
                Err(e) => {
                    warn!(%key, error = %e, "query failed");
                    entry.error = Some(e.clone());
                    entry.status = QueryStatus::Error;
                }
            }
        }
        self.notify(key);
    }

    fn notify(&self, key: &QueryKey) {
        let listeners: Vec<Listener> = self
            .inner
            .entries
            .borrow()
            .get(key)
            .map(|entry| entry.observers.values().cloned().collect())
            .unwrap_or_default();
        for listener in listeners {
            listener();
        }
    }
}

#[cfg(test)]
mod tests;
