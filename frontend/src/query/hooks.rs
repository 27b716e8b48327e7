//! Leptos bindings for the query cache.

use std::future::Future;
use std::rc::Rc;

use aula_shared::ApiRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::trace;

use super::{QueryCache, QueryKey, QueryState, fetcher, run_mutation};
use crate::context::use_app;
use crate::error::ApiResult;

/// Subscribes the current component to `key`.
///
/// The returned memo tracks what the page renders for the entry (see
/// `QueryState::rendered`): a background refetch that brings back the same
/// data does not notify. The subscription is owned by the reactive owner and
/// ends when the component unmounts; a response that lands afterwards
/// updates the cache but no longer this component.
pub fn use_query<T, F, Fut>(key: QueryKey, fetch: F) -> Memo<QueryState<T>>
where
    T: PartialEq + Send + Sync + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    let cache = use_app().cache();
    let state = RwSignal::new(cache.snapshot::<T>(&key));

    let listener = {
        let cache = cache.downgrade();
        let key = key.clone();
        Rc::new(move || {
            if let Some(cache) = cache.upgrade() {
                let _ = state.try_set(cache.snapshot::<T>(&key));
            }
        })
    };

    let observer = cache.observe(key.clone(), fetcher(fetch), listener);
    trace!(
        %key,
        entry = ?cache.entry_state(&key),
        observers = cache.observer_count(&key),
        "query mounted"
    );
    StoredValue::new_local(observer);

    Memo::new(move |_| state.with(QueryState::rendered))
}

/// `use_query` for a single endpoint: `request` builds the request each time
/// the entry is (re)fetched.
pub fn use_api_query<R, F>(key: QueryKey, request: F) -> Memo<QueryState<R::Response>>
where
    R: ApiRequest + 'static,
    R::Response: PartialEq + Send + Sync,
    F: Fn() -> R + 'static,
{
    let api = use_app().api();
    use_query(key, move || {
        let api = api.clone();
        let req = request();
        async move { api.send(&req).await }
    })
}

/// Runs a server write in the background.
///
/// `pending` is raised until the write settles. On success the given keys are
/// invalidated before `on_done` runs.
pub fn spawn_mutation<T, Fut, C>(
    cache: QueryCache,
    pending: RwSignal<bool>,
    mutation: Fut,
    invalidates: Vec<QueryKey>,
    on_done: C,
) where
    T: 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
    C: FnOnce(ApiResult<T>) + 'static,
{
    pending.set(true);
    spawn_local(async move {
        let result = run_mutation(&cache, mutation, &invalidates).await;
        let _ = pending.try_set(false);
        on_done(result);
    });
}
