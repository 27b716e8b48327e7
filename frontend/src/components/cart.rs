use aula_shared::CartItem;
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::collection::EmptyState;
use crate::components::format;
use crate::components::layout::PageHeader;
use crate::context::use_app;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn CartPage() -> impl IntoView {
    let app = use_app();
    let cart = app.cart();

    view! {
        <PageHeader title="Carrito" />
        {move || {
            let current = cart.get();
            if current.is_empty() {
                return view! {
                    <EmptyState
                        title="Tu carrito está vacío"
                        message="Explora el catálogo y agrega los cursos que te interesen."
                        action=("Ver cursos", AppRoute::Catalog)
                    />
                }
                    .into_any();
            }
            view! {
                <div class="grid gap-8 lg:grid-cols-3">
                    <ul class="lg:col-span-2 space-y-3">
                        {current
                            .items()
                            .iter()
                            .cloned()
                            .map(|item| view! { <CartLine item=item /> })
                            .collect_view()}
                    </ul>
                    <OrderSummary
                        count=current.count()
                        total=current.total()
                        action=("Ir a pagar", AppRoute::Checkout)
                    />
                </div>
            }
                .into_any()
        }}
    }
}

#[component]
fn CartLine(item: CartItem) -> impl IntoView {
    let app = use_app();
    let id = item.id.clone();
    let detail = AppRoute::CourseDetail { id: item.id.clone() };

    view! {
        <li class="card card-side bg-base-100 shadow-sm">
            {item
                .thumbnail
                .clone()
                .map(|src| {
                    view! {
                        <figure class="w-32 shrink-0">
                            <img src=src alt="" class="h-full object-cover" />
                        </figure>
                    }
                })}
            <div class="card-body py-4 flex-row items-center justify-between">
                <div>
                    <Link to=detail class="font-semibold link-hover">
                        {item.title.clone()}
                    </Link>
                    {item
                        .instructor
                        .clone()
                        .map(|name| view! { <p class="text-sm text-base-content/70">{name}</p> })}
                </div>
                <div class="flex items-center gap-4">
                    <span class="font-semibold">{format::price(item.price)}</span>
                    <button
                        class="btn btn-ghost btn-sm text-error"
                        on:click=move |_| {
                            app.remove_from_cart(&id);
                        }
                    >
                        "Quitar"
                    </button>
                </div>
            </div>
        </li>
    }
}

#[component]
fn OrderSummary(count: usize, total: f64, action: (&'static str, AppRoute)) -> impl IntoView {
    let (label, to) = action;
    view! {
        <div class="card bg-base-100 shadow h-fit">
            <div class="card-body gap-3">
                <h2 class="card-title">"Resumen"</h2>
                <div class="flex justify-between">
                    <span>{count} " cursos"</span>
                    <span class="text-xl font-bold">{format::money(total)}</span>
                </div>
                <Link to=to class="btn btn-primary">
                    {label}
                </Link>
            </div>
        </div>
    }
}

/// Mock checkout: no payment provider is called. Confirming empties the cart.
#[component]
pub fn CheckoutPage() -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let router = use_router();
    let cart = app.cart();
    let buyer = move || auth.state.with(|s| s.user.as_ref().map(|u| u.email.clone()));

    let confirm = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        app.clear_cart();
        app.notify("¡Compra simulada con éxito!");
        router.navigate_to(AppRoute::MyCourses);
    };

    view! {
        <PageHeader title="Pago" subtitle="Modo demostración: no se realiza ningún cargo." />
        {move || {
            let current = cart.get();
            if current.is_empty() {
                return view! {
                    <EmptyState
                        title="Nada que pagar"
                        message="Agrega cursos al carrito antes de pagar."
                        action=("Ver cursos", AppRoute::Catalog)
                    />
                }
                    .into_any();
            }
            view! {
                <form class="card bg-base-100 shadow max-w-lg" on:submit=confirm>
                    <div class="card-body gap-4">
                        <ul class="space-y-1">
                            {current
                                .items()
                                .iter()
                                .map(|item| {
                                    view! {
                                        <li class="flex justify-between">
                                            <span>{item.title.clone()}</span>
                                            <span>{format::price(item.price)}</span>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                        <div class="divider my-0"></div>
                        <div class="flex justify-between text-lg font-bold">
                            <span>"Total"</span>
                            <span>{format::money(current.total())}</span>
                        </div>
                        {buyer().map(|email| view! { <p class="text-sm opacity-70">"Recibo para " {email}</p> })}
                        <button type="submit" class="btn btn-primary">
                            "Confirmar compra"
                        </button>
                    </div>
                </form>
            }
                .into_any()
        }}
    }
}
