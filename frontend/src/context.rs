//! Application context shared by every component.
//!
//! The API client, query cache and persisted state are created once in `App`
//! and handed out through Leptos context. The cart is mirrored into a signal
//! so views update when it changes; storage stays the source of truth across
//! reloads.

use aula_shared::{ApiRequest, Cart, CartItem};
use leptos::prelude::*;
use tracing::debug;

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::query::{QueryCache, QueryKey, spawn_mutation};
use crate::state::{AppState, SessionStore};

/// A transient message in the corner of the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub is_error: bool,
}

struct Services {
    api: ApiClient,
    cache: QueryCache,
    state: AppState,
}

#[derive(Clone, Copy)]
pub struct AppContext {
    services: StoredValue<Services, LocalStorage>,
    cart: RwSignal<Cart>,
    toast: RwSignal<Option<Toast>>,
}

impl AppContext {
    pub fn new(api: ApiClient, cache: QueryCache, state: AppState) -> Self {
        let cart = RwSignal::new(state.cart.cart().clone());
        Self {
            services: StoredValue::new_local(Services { api, cache, state }),
            cart,
            toast: RwSignal::new(None),
        }
    }

    pub fn api(&self) -> ApiClient {
        self.services.with_value(|s| s.api.clone())
    }

    pub fn cache(&self) -> QueryCache {
        self.services.with_value(|s| s.cache.clone())
    }

    pub fn session(&self) -> SessionStore {
        self.services.with_value(|s| s.state.session.clone())
    }

    /// Sends `req` as a mutation: `pending` is raised until the server
    /// answers, and on success `invalidates` are refetched.
    pub fn mutate<R, C>(&self, pending: RwSignal<bool>, req: R, invalidates: Vec<QueryKey>, on_done: C)
    where
        R: ApiRequest + 'static,
        C: FnOnce(ApiResult<R::Response>) + 'static,
    {
        let api = self.api();
        spawn_mutation(
            self.cache(),
            pending,
            async move { api.send(&req).await },
            invalidates,
            on_done,
        );
    }

    /// Ends the session, keeping the cart.
    pub fn teardown(&self) {
        self.services.with_value(|s| s.state.teardown());
    }

    // =========================================================
    // Cart
    // =========================================================

    pub fn cart(&self) -> ReadSignal<Cart> {
        self.cart.read_only()
    }

    pub fn in_cart(&self, id: &str) -> Signal<bool> {
        let cart = self.cart;
        let id = id.to_string();
        Signal::derive(move || cart.with(|c| c.contains(&id)))
    }

    /// Adds `item` unless it is already in the cart.
    pub fn add_to_cart(&self, item: CartItem) -> bool {
        let updated = self
            .services
            .try_update_value(|s| s.state.cart.add(item).then(|| s.state.cart.cart().clone()))
            .flatten();
        self.publish_cart(updated)
    }

    pub fn remove_from_cart(&self, id: &str) -> bool {
        let updated = self
            .services
            .try_update_value(|s| s.state.cart.remove(id).then(|| s.state.cart.cart().clone()))
            .flatten();
        self.publish_cart(updated)
    }

    pub fn clear_cart(&self) {
        let updated = self.services.try_update_value(|s| {
            s.state.cart.clear();
            s.state.cart.cart().clone()
        });
        self.publish_cart(updated);
    }

    fn publish_cart(&self, updated: Option<Cart>) -> bool {
        match updated {
            Some(cart) => {
                debug!(count = cart.count(), "cart changed");
                self.cart.set(cart);
                true
            }
            None => false,
        }
    }

    // =========================================================
    // Toasts
    // =========================================================

    pub fn toast(&self) -> ReadSignal<Option<Toast>> {
        self.toast.read_only()
    }

    pub fn dismiss_toast(&self) {
        self.toast.set(None);
    }

    pub fn notify(&self, message: impl Into<String>) {
        self.toast.set(Some(Toast {
            message: message.into(),
            is_error: false,
        }));
    }

    pub fn notify_error(&self, error: &ApiError) {
        self.alert(error.user_message());
    }

    /// Error toast for problems caught before any request is sent.
    pub fn alert(&self, message: impl Into<String>) {
        self.toast.set(Some(Toast {
            message: message.into(),
            is_error: true,
        }));
    }

    /// Completion callback for `mutate` that only reports the outcome.
    pub fn report<T>(&self, success: &'static str) -> impl FnOnce(ApiResult<T>) + 'static {
        let app = *self;
        move |result| match result {
            Ok(_) => app.notify(success),
            Err(e) => app.notify_error(&e),
        }
    }
}

pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
