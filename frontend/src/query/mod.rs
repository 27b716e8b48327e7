//! Server-state caching.
//!
//! `cache` holds the keyed store, `hooks` binds it to Leptos components,
//! `keys` names the queries the pages use.

mod cache;
mod hooks;
mod key;
pub mod keys;
mod mutation;
mod state;

pub use cache::{
    CacheConfig, FetchResult, Fetcher, Listener, Observer, QueryCache, SharedFetch, Spawner,
    WeakQueryCache, fetcher,
};
pub use hooks::{spawn_mutation, use_api_query, use_query};
pub use key::QueryKey;
pub use mutation::run_mutation;
pub use state::{EntryState, QueryState, QueryStatus, Trigger};
