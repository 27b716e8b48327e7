//! Persisted cart.
//!
//! Wraps the `Cart` aggregate and writes the whole set back to storage after
//! every change. There is exactly one writer (the current tab), so no merge
//! or conflict handling is attempted.

use std::rc::Rc;

use aula_shared::{Cart, CartItem, storage_keys};
use tracing::{debug, warn};

use super::storage::KeyValueStore;

#[derive(Clone)]
pub struct CartStore {
    cart: Cart,
    store: Rc<dyn KeyValueStore>,
}

impl CartStore {
    /// Rehydrates the cart from storage. A missing or corrupt entry yields an
    /// empty cart.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let cart = match store.get(storage_keys::CART) {
            Some(raw) => serde_json::from_str::<Cart>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable cart from storage");
                Cart::new()
            }),
            None => Cart::new(),
        };
        debug!(count = cart.count(), "cart loaded");
        Self { cart, store }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds `item` unless its id is already in the cart.
    pub fn add(&mut self, item: CartItem) -> bool {
        let changed = self.cart.add(item);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let changed = self.cart.remove(id);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    pub fn total(&self) -> f64 {
        self.cart.total()
    }

    pub fn count(&self) -> usize {
        self.cart.count()
    }

    fn persist(&self) {
        match serde_json::to_string(&self.cart) {
            Ok(raw) => {
                if !self.store.set(storage_keys::CART, &raw) {
                    warn!("cart could not be written to storage");
                }
            }
            Err(e) => warn!(error = %e, "cart could not be serialized"),
        }
    }
}
