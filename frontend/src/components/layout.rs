use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::components::feedback::ToastHost;
use crate::context::use_app;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// Navbar, toast host and the page content.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Navbar />
            <ToastHost />
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">{children()}</main>
        </div>
    }
}

#[component]
fn Navbar() -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let router = use_router();
    let is_authenticated = auth.is_authenticated_signal();
    let can_teach = auth.can_teach_signal();
    let cart = app.cart();
    let in_studio = move || router.current_route().with(AppRoute::is_studio);

    view! {
        <div class="navbar bg-base-100 shadow">
            <div class="flex-1">
                <Link to=AppRoute::Catalog class="btn btn-ghost text-xl">
                    "Aula"
                </Link>
            </div>
            <nav class="flex-none flex items-center gap-1">
                <Link to=AppRoute::Catalog class="btn btn-ghost btn-sm">
                    "Cursos"
                </Link>
                <Show when=move || is_authenticated.get()>
                    <Link to=AppRoute::MyCourses class="btn btn-ghost btn-sm">
                        "Mis cursos"
                    </Link>
                    <Link to=AppRoute::Notifications class="btn btn-ghost btn-sm">
                        "Notificaciones"
                    </Link>
                </Show>
                <Show when=move || can_teach.get()>
                    <Link to=AppRoute::Studio class="btn btn-ghost btn-sm">
                        "Studio"
                        <Show when=in_studio>
                            <span class="badge badge-secondary badge-xs"></span>
                        </Show>
                    </Link>
                </Show>
                <Link to=AppRoute::Cart class="btn btn-ghost btn-sm">
                    "Carrito"
                    <span class="badge badge-primary badge-sm">
                        {move || cart.with(|c| c.count())}
                    </span>
                </Link>
                <Show
                    when=move || is_authenticated.get()
                    fallback=|| {
                        view! {
                            <Link to=AppRoute::Login class="btn btn-primary btn-sm">
                                "Iniciar sesión"
                            </Link>
                        }
                    }
                >
                    <Link to=AppRoute::Profile class="btn btn-ghost btn-sm">
                        "Perfil"
                    </Link>
                    <button class="btn btn-outline btn-sm" on:click=move |_| logout(&app, &auth)>
                        "Salir"
                    </button>
                </Show>
            </nav>
        </div>
    }
}

#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(into, optional)] subtitle: Option<String>,
) -> impl IntoView {
    view! {
        <div>
            <h1 class="text-3xl font-bold">{title}</h1>
            {subtitle.map(|s| view! { <p class="text-base-content/70 mt-1">{s}</p> })}
        </div>
    }
}
