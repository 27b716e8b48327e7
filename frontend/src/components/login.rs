use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{login, signup, use_auth};
use crate::context::use_app;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// Validation shared by the login and signup forms. Returns the message to
/// show, if any.
pub fn validate_credentials(email: &str, password: &str) -> Option<&'static str> {
    if email.trim().is_empty() || password.is_empty() {
        return Some("Completa todos los campos");
    }
    if !email.contains('@') {
        return Some("El correo no es válido");
    }
    None
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let app = use_app();
    let auth = use_auth();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(msg) = validate_credentials(&email.get(), &password.get()) {
            set_error_msg.set(Some(msg.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            // On success the router redirects when the auth signal flips.
            if let Err(e) = login(&app, &auth, email.get_untracked().trim().to_string(), password.get_untracked()).await {
                let _ = set_error_msg.try_set(Some(e.user_message()));
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    view! {
        <AuthCard title="Iniciar sesión" subtitle="Accede a tus cursos y a tu progreso">
            <form class="card-body" on:submit=on_submit>
                <ErrorAlert message=error_msg />
                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Correo electrónico"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        placeholder="tu@correo.com"
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        prop:value=email
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">"Contraseña"</span>
                    </label>
                    <input
                        id="password"
                        type="password"
                        placeholder="••••••••"
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        prop:value=password
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Entrando…" }.into_any()
                        } else {
                            "Entrar".into_any()
                        }}
                    </button>
                </div>
                <p class="text-sm text-center mt-2">
                    "¿No tienes cuenta? "
                    <Link to=AppRoute::Signup class="link link-primary">"Regístrate"</Link>
                </p>
            </form>
        </AuthCard>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let app = use_app();
    let auth = use_auth();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let check = if name.get().trim().is_empty() {
            Some("Completa todos los campos")
        } else {
            validate_credentials(&email.get(), &password.get())
        };
        if let Some(msg) = check {
            set_error_msg.set(Some(msg.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let result = signup(
                &app,
                &auth,
                name.get_untracked().trim().to_string(),
                email.get_untracked().trim().to_string(),
                password.get_untracked(),
            )
            .await;
            if let Err(e) = result {
                let _ = set_error_msg.try_set(Some(e.user_message()));
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    view! {
        <AuthCard title="Crear cuenta" subtitle="Empieza a aprender hoy mismo">
            <form class="card-body" on:submit=on_submit>
                <ErrorAlert message=error_msg />
                <div class="form-control">
                    <label class="label" for="name">
                        <span class="label-text">"Nombre"</span>
                    </label>
                    <input
                        id="name"
                        type="text"
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                        prop:value=name
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Correo electrónico"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        placeholder="tu@correo.com"
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        prop:value=email
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">"Contraseña"</span>
                    </label>
                    <input
                        id="password"
                        type="password"
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        prop:value=password
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Creando cuenta…" }.into_any()
                        } else {
                            "Registrarme".into_any()
                        }}
                    </button>
                </div>
                <p class="text-sm text-center mt-2">
                    "¿Ya tienes cuenta? "
                    <Link to=AppRoute::Login class="link link-primary">"Inicia sesión"</Link>
                </p>
            </form>
        </AuthCard>
    }
}

#[component]
fn AuthCard(title: &'static str, subtitle: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="hero min-h-[70vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">{title}</h1>
                    <p class="text-base-content/70">{subtitle}</p>
                </div>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">{children()}</div>
            </div>
        </div>
    }
}

#[component]
fn ErrorAlert(message: ReadSignal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|msg| {
            view! {
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{msg}</span>
                </div>
            }
        })
    }
}
