//! Key/value persistence seam.
//!
//! The browser implementation lives in `web::BrowserStorage`; `MemoryStore`
//! backs tests and serves as the fallback when local storage is unavailable
//! (private mode, disabled cookies).

use std::cell::RefCell;
use std::collections::HashMap;

/// String key/value store with the same semantics as `window.localStorage`.
///
/// Writes report success as `bool`; a failed write is never fatal for the
/// caller.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value);
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.values.borrow_mut().remove(key);
        true
    }
}
