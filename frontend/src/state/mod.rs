//! Client-only application state.
//!
//! Everything the app persists in the browser (sign-in flag, token, cart,
//! tenant override) is owned by one `AppState` container created at startup,
//! instead of components reading local storage on their own.

mod cart;
mod session;
mod storage;

pub use cart::CartStore;
pub use session::SessionStore;
pub use storage::{KeyValueStore, MemoryStore};

use std::rc::Rc;

use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub cart: CartStore,
}

impl AppState {
    /// Builds the state from whatever is already persisted.
    pub fn init(store: Rc<dyn KeyValueStore>) -> Self {
        let state = Self {
            session: SessionStore::new(store.clone()),
            cart: CartStore::load(store),
        };
        debug!(
            authenticated = state.session.is_authenticated(),
            cart_items = state.cart.count(),
            "app state initialised"
        );
        state
    }

    /// Ends the session. The cart is kept so a returning user finds it again.
    pub fn teardown(&self) {
        self.session.sign_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_shared::{CartItem, storage_keys};

    #[test]
    fn init_reads_persisted_state_and_teardown_keeps_cart() {
        let store = Rc::new(MemoryStore::with_entries([
            (storage_keys::IS_AUTH, "true"),
            (storage_keys::TOKEN, "jwt"),
            (
                storage_keys::CART,
                r#"[{"id":"c1","title":"Rust","price":15}]"#,
            ),
        ]));
        let mut state = AppState::init(store.clone());
        assert!(state.session.is_authenticated());
        assert_eq!(state.cart.count(), 1);

        state.cart.add(CartItem {
            id: "c2".to_string(),
            title: "Leptos".to_string(),
            price: 5.0,
            thumbnail: None,
            instructor: None,
        });
        state.teardown();

        let reloaded = AppState::init(store);
        assert!(!reloaded.session.is_authenticated());
        assert_eq!(reloaded.cart.count(), 2);
        assert_eq!(reloaded.cart.total(), 20.0);
    }
}
