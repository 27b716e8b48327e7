//! Aula web client.
//!
//! Services are handed down through Leptos context:
//! - `web::route`: the route table and its guard
//! - `web::router`: History-API navigation
//! - `api` / `transport`: tenant-aware HTTP client
//! - `query`: query cache (de-duplication, revalidation, invalidation)
//! - `state`: persisted session and cart
//! - `auth`: auth state
//! - `components`: pages and widgets

mod api;
mod auth;
pub mod config;
mod context;
mod error;
pub mod logging;
mod query;
mod state;
mod transport;

mod components {
    pub mod cart;
    pub mod catalog;
    pub mod collection;
    pub mod course_detail;
    pub mod discussions;
    pub mod feedback;
    pub mod format;
    pub mod layout;
    pub mod login;
    pub mod my_courses;
    pub mod notifications;
    pub mod profile;
    pub mod studio;
}

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use leptos::prelude::*;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::auth::{AuthContext, init_auth};
use crate::components::cart::{CartPage, CheckoutPage};
use crate::components::catalog::CatalogPage;
use crate::components::course_detail::CourseDetailPage;
use crate::components::discussions::DiscussionsPage;
use crate::components::layout::Shell;
use crate::components::login::{LoginPage, SignupPage};
use crate::components::my_courses::MyCoursesPage;
use crate::components::notifications::NotificationsPage;
use crate::components::profile::ProfilePage;
use crate::components::studio::{
    CouponsPage, FinancesPage, ReportsPage, ResourcesPage, RosterPage, StudioPage,
};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::query::QueryCache;
use crate::state::{AppState, KeyValueStore, MemoryStore};

// Thin wrappers over browser APIs: fetch, localStorage, History and window
// events.
pub(crate) mod web {
    pub mod events;
    mod http;
    pub mod location;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::BrowserTransport;
    pub use storage::BrowserStorage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// Maps a route to its page, wrapped in the shared `Shell`.
fn route_matcher(route: AppRoute) -> AnyView {
    let page = match route {
        AppRoute::Catalog => view! { <CatalogPage /> }.into_any(),
        AppRoute::CourseDetail { id } => view! { <CourseDetailPage id=id /> }.into_any(),
        AppRoute::Discussions { course_id } => {
            view! { <DiscussionsPage course_id=course_id /> }.into_any()
        }
        AppRoute::Cart => view! { <CartPage /> }.into_any(),
        AppRoute::Checkout => view! { <CheckoutPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::MyCourses => view! { <MyCoursesPage /> }.into_any(),
        AppRoute::Notifications => view! { <NotificationsPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Studio => view! { <StudioPage /> }.into_any(),
        AppRoute::StudioCoupons => view! { <CouponsPage /> }.into_any(),
        AppRoute::StudioFinances => view! { <FinancesPage /> }.into_any(),
        AppRoute::StudioReports => view! { <ReportsPage /> }.into_any(),
        AppRoute::StudioRoster { course_id } => {
            view! { <RosterPage course_id=course_id /> }.into_any()
        }
        AppRoute::StudioResources { course_id } => {
            view! { <ResourcesPage course_id=course_id /> }.into_any()
        }
        AppRoute::NotFound => view! {
            <div class="hero min-h-[60vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Página no encontrada"</p>
                    <Link to=AppRoute::Catalog class="btn btn-primary mt-6">
                        "Volver al catálogo"
                    </Link>
                </div>
            </div>
        }
        .into_any(),
    };

    view! { <Shell>{page}</Shell> }.into_any()
}

/// `localStorage` when the browser offers it, memory otherwise.
fn persistent_store() -> Rc<dyn KeyValueStore> {
    if web::BrowserStorage::is_available() {
        Rc::new(web::BrowserStorage)
    } else {
        warn!("localStorage unavailable, session and cart will not survive a reload");
        Rc::new(MemoryStore::default())
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_build_env();

    // 1. Persisted state, HTTP client and query cache
    let store = persistent_store();
    let state = AppState::init(store.clone());
    let api = ApiClient::new(
        &config.api_base_url,
        &web::location::hostname(),
        store,
        Rc::new(web::BrowserTransport),
    );
    info!(api = %api.base_url(), tenant = %api.tenant_id(), "starting");

    let cache = QueryCache::new(
        config.cache,
        Rc::new(|fut: LocalBoxFuture<'static, ()>| leptos::task::spawn_local(fut)),
    );
    web::events::install_revalidation_listeners(&cache);

    // 2. App context
    let app = AppContext::new(api, cache, state);
    provide_context(app);

    // 3. Auth context, restored from the persisted session
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&app, &auth_ctx);

    // 4. The router only sees the auth signal
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 5. Router with the guard wired to the auth signal
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
