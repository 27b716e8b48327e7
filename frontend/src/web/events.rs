//! Window events that revalidate the query cache.
//!
//! Regaining focus or coming back online refetches every mounted, stale
//! query.

use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::query::{QueryCache, Trigger};

/// Installs the `focus` and `online` listeners. They hold the cache weakly
/// and are leaked for the lifetime of the page.
pub fn install_revalidation_listeners(cache: &QueryCache) {
    let Some(window) = web_sys::window() else {
        return;
    };

    for (event, trigger) in [("focus", Trigger::Focus), ("online", Trigger::Reconnect)] {
        let weak = cache.downgrade();
        let closure = Closure::<dyn Fn()>::new(move || {
            if let Some(cache) = weak.upgrade() {
                cache.revalidate(trigger);
            }
        });

        if window
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .is_err()
        {
            warn!(event, "failed to install revalidation listener");
        }
        closure.forget();
    }
}
