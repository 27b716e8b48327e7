use std::rc::Rc;

use aula_shared::storage_keys;
use tracing::info;

use super::storage::KeyValueStore;

/// Persisted sign-in state: the `isAuth` flag and the bearer token.
#[derive(Clone)]
pub struct SessionStore {
    store: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get(storage_keys::IS_AUTH).as_deref() == Some("true")
    }

    /// The bearer token, if one is stored and non-empty.
    pub fn token(&self) -> Option<String> {
        self.store
            .get(storage_keys::TOKEN)
            .filter(|token| !token.is_empty())
    }

    pub fn sign_in(&self, token: &str) {
        self.store.set(storage_keys::TOKEN, token);
        self.store.set(storage_keys::IS_AUTH, "true");
        info!("session started");
    }

    pub fn sign_out(&self) {
        self.store.remove(storage_keys::TOKEN);
        self.store.remove(storage_keys::IS_AUTH);
        info!("session ended");
    }
}
